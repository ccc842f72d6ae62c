//! promzy: Promzy bot main binary
//!
//! Usage:
//!   promzy            - Chat bot REPL (simulated chats)
//!   promzy --pair     - Pair-code bot REPL (simulated WhatsApp direct messages)
//!   promzy --help     - Show help

mod cli;

use promzy_core::{Config, Dispatcher, SessionStore};
use promzy_pair::{PairBot, PairCodeRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Simulated chat bot
    Chat,
    /// Pair-code bot
    Pair,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args(std::env::args().skip(1));

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("promzy {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Keep the REPL readable unless RUST_LOG asks for more
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    tracing::info!("Starting {}...", config.bot.name);

    match mode {
        RunMode::Pair => {
            let registry = PairCodeRegistry::new(&config.pair)
                .map_err(|e| anyhow::anyhow!("Failed to create pair registry: {}", e))?;
            cli::run_pair(PairBot::new(registry)).await
        }
        _ => {
            let store = Arc::new(SessionStore::new());
            let dispatcher = Dispatcher::new(store, &config.bot);
            cli::run_chat(dispatcher)
        }
    }
}

/// Parse command line arguments
fn parse_args(args: impl IntoIterator<Item = String>) -> RunMode {
    for arg in args {
        match arg.as_str() {
            "--pair" | "-p" => return RunMode::Pair,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Chat
}

/// Print help message
fn print_help() {
    println!("promzy - Promzy chat bot");
    println!();
    println!("Usage:");
    println!("  promzy           Start the chat bot REPL");
    println!("  promzy --pair    Start the pair-code bot REPL");
    println!("  promzy --help    Show this help message");
    println!("  promzy --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  PROMZY_BOT_NAME      Bot display name (default: Promzy v1)");
    println!("  PAIR_CODE_LENGTH     Pair code length (default: 8)");
    println!("  PAIR_CODE_TTL_HOURS  Pair code lifetime in hours (default: 24)");
    println!("  RUST_LOG             Log filter (default: warn)");
    println!();
    println!("Settings can also be placed in ./promzy.toml");
}
