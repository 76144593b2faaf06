use std::io::{self, BufRead, Write};
use std::time::Duration;

use kolzo_core::config::{AppConfig, LoadOptions};
use kolzo_widget::{ChatSession, Sender, SessionCapabilities};

use crate::commands::CommandResult;

/// Interactive concierge session against inert capabilities: navigation and
/// external links print where they would have gone, every subscribe
/// succeeds. Type a button number or free text; `quit` leaves.
pub fn run() -> CommandResult {
    let typing_delay = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => Duration::from_millis(config.widget.typing_delay_ms),
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    runtime.block_on(async move {
        let mut session = ChatSession::new(SessionCapabilities::inert(), typing_delay);
        let mut rendered = 0;
        session.open();
        rendered = render_new_messages(&session, rendered);

        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let Some(Ok(line)) = lines.next() else {
                break;
            };
            let input = line.trim().to_string();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
                break;
            }

            let turn = match button_by_index(&session, &input) {
                Some(button) => session.press(&button).await,
                None => session.say(&input).await,
            };

            if let Err(error) = turn {
                println!("! {error}");
            }
            rendered = render_new_messages(&session, rendered);
        }
    });

    CommandResult::success("chat", "session closed")
}

fn button_by_index(
    session: &ChatSession,
    input: &str,
) -> Option<kolzo_core::dialogue::replies::ButtonSpec> {
    let index: usize = input.parse().ok()?;
    let last_bot = session.transcript().iter().rev().find(|m| m.sender == Sender::Bot)?;
    last_bot.buttons.get(index.checked_sub(1)?).cloned()
}

fn render_new_messages(session: &ChatSession, already_rendered: usize) -> usize {
    let messages = session.transcript();
    for message in &messages[already_rendered..] {
        match message.sender {
            Sender::User => println!("you: {}", message.text),
            Sender::Bot => {
                println!("kolzo: {}", message.text);
                for (position, button) in message.buttons.iter().enumerate() {
                    println!("  [{}] {}", position + 1, button.label);
                }
            }
        }
    }
    messages.len()
}
