pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "kolzo",
    about = "Kolzo storefront operator CLI",
    long_about = "Inspect configuration, check storefront readiness, query the catalog, and \
                  drive the concierge chat from a terminal.",
    after_help = "Examples:\n  kolzo doctor --json\n  kolzo config\n  kolzo catalog --query silk --gender women --sort price\n  kolzo chat"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog data, and newsletter integration readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Query the catalog snapshot with the storefront's filter/search/sort")]
    Catalog {
        #[arg(long, help = "Free-text search query")]
        query: Option<String>,
        #[arg(long, help = "Category filter (case-insensitive exact match)")]
        category: Option<String>,
        #[arg(long, help = "Gender filter: men|women|unisex")]
        gender: Option<String>,
        #[arg(long, help = "Brand filter (case-insensitive exact match)")]
        brand: Option<String>,
        #[arg(long, help = "Only featured products")]
        featured: bool,
        #[arg(long, help = "Sort field: name|price|rating|created_at|sales_count")]
        sort: Option<String>,
        #[arg(long, help = "Sort direction: asc|desc", default_value = "asc")]
        direction: String,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
        #[arg(long, help = "Catalog JSON file to load instead of the configured source")]
        data: Option<PathBuf>,
    },
    #[command(about = "Drive the concierge chat interactively against inert capabilities")]
    Chat,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Catalog {
            query,
            category,
            gender,
            brand,
            featured,
            sort,
            direction,
            limit,
            data,
        } => commands::catalog::run(commands::catalog::CatalogArgs {
            query,
            category,
            gender,
            brand,
            featured,
            sort,
            direction,
            limit,
            data,
        }),
        Command::Chat => commands::chat::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
