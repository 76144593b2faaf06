use std::process::ExitCode;

fn main() -> ExitCode {
    kolzo_cli::run()
}
