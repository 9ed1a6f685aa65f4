//! Cotacao Bot - Main Entry Point
//!
//! A Telegram bot that answers `/dolar`, `/euro` and `/libra` with the
//! current quote in Brazilian reais.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cotacao_bot::bot::MessageLoop;
use cotacao_bot::commands::{CommandHandler, CommandTable};
use cotacao_bot::config::BotSettings;
use cotacao_bot::quotes::AwesomeApiClient;
use cotacao_bot::telegram::TelegramBot;

/// Telegram bot for BRL exchange-rate quotes.
#[derive(Parser, Debug)]
#[command(name = "cotacao_bot")]
#[command(about = "Reply to Telegram commands with current BRL exchange rates")]
#[command(version)]
struct Args {
    /// Path to a JSON command table (built-in table if omitted).
    #[arg(short, long)]
    commands: Option<String>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example command table file and exit.
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    if args.generate_config {
        return generate_example_config();
    }

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let settings = BotSettings::from_env()
        .context("Failed to load bot configuration from environment")?;

    let table = match &args.commands {
        Some(path) => CommandTable::load_from_file(path)
            .with_context(|| format!("Failed to load command table from {path}"))?,
        None => CommandTable::default(),
    };

    table
        .validate()
        .context("Command table validation failed")?;

    info!("Loaded {} commands", table.len());

    // One HTTP client serves both the Bot API and the quotes API.
    let http = reqwest::Client::new();

    let bot = TelegramBot::connect(http.clone(), &settings)
        .await
        .context("Failed to connect to Telegram")?;

    let me = bot.me();
    info!(
        "Bot @{} started",
        me.username.as_deref().unwrap_or(&me.first_name)
    );

    let quotes = AwesomeApiClient::new(http, &settings.quotes_api_url);
    let handler = CommandHandler::new(table, quotes);
    let mut message_loop = MessageLoop::new(bot, handler);

    info!("Bot is running. Use Ctrl+C to stop.");

    tokio::select! {
        () = message_loop.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example command table file.
fn generate_example_config() -> Result<()> {
    let example = CommandTable::example();
    example.save_to_file("commands.example.json")?;

    println!("✓ Example command table written to: commands.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy commands.example.json to commands.json and edit it");
    println!("2. Create a .env file with TGBOT_TOKEN");
    println!("3. Run: cotacao_bot --commands commands.json");

    Ok(())
}
