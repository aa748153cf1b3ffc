//! Caución Monitor - BYMA rates to Telegram
//!
//! Watches the BYMA cauciones board, evaluates capital rules and alerts
//! the operator over Telegram.

use caucion_alerts::{
    InstanceLock, Notifier, NotifierError, RulesStore, StateStore, StoreError, TelegramBot,
};
use caucion_engine::evaluate_cycle;
use caucion_feeds::{BymaClient, FeedConfig, FeedError};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Caución monitor CLI
#[derive(Parser, Debug)]
#[command(name = "caucion-bot")]
#[command(about = "BYMA caución monitor with Telegram alerts", long_about = None)]
struct Args {
    /// Rules document path
    #[arg(long, default_value = "rules.json")]
    rules: String,

    /// Notification state file path
    #[arg(long, default_value = "state.json")]
    state: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run one evaluation cycle and exit
    Cycle,
    /// Run evaluation cycles on an interval
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
    /// Run the interactive Telegram command bot
    Bot,
}

#[derive(Error, Debug)]
enum CycleError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("notifier error: {0}")]
    Notifier(#[from] NotifierError),
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn lock_path(state_path: &str) -> String {
    format!("{}.lock", state_path)
}

/// One full cycle: load, fetch, evaluate, deliver, persist.
async fn run_cycle(
    client: &BymaClient,
    rules_store: &RulesStore,
    state_store: &StateStore,
    notifier: &Notifier,
) -> Result<(), CycleError> {
    let rules = rules_store.load()?;
    let mut state = state_store.load()?;

    let rows = client.fetch_cauciones().await?;
    let now = Utc::now();
    let outcome = evaluate_cycle(&rows, &rules, &state, now.timestamp());

    let sent = notifier.process_cycle(&outcome, &mut state, now).await?;
    if sent == 0 {
        info!("Cycle finished quiet");
    }
    state_store.save_if_dirty(&mut state)?;
    Ok(())
}

async fn run(args: Args) -> i32 {
    info!("🚀 Caución monitor starting...");
    info!("  Rules: {}", args.rules);
    info!("  State: {}", args.state);

    let feed = FeedConfig::from_env();
    let rules_store = RulesStore::new(&args.rules);

    let Some(bot) = TelegramBot::from_env(rules_store.clone(), feed.clone()) else {
        error!("Missing or invalid TELEGRAM_TOKEN / TELEGRAM_CHAT_ID");
        return 1;
    };
    let bot = Arc::new(bot);

    match args.command {
        Cmd::Cycle => {
            let _lock = match InstanceLock::acquire(lock_path(&args.state)) {
                Ok(lock) => lock,
                Err(err) => {
                    error!("{}", err);
                    return 1;
                }
            };
            let client = match BymaClient::new(&feed) {
                Ok(client) => client,
                Err(err) => {
                    error!("Failed to build feed client: {}", err);
                    return 1;
                }
            };
            let state_store = StateStore::new(&args.state);
            let notifier = Notifier::new(bot);

            match run_cycle(&client, &rules_store, &state_store, &notifier).await {
                Ok(()) => 0,
                Err(err) => {
                    error!("Cycle failed: {}", err);
                    1
                }
            }
        }

        Cmd::Watch { interval } => {
            let _lock = match InstanceLock::acquire(lock_path(&args.state)) {
                Ok(lock) => lock,
                Err(err) => {
                    error!("{}", err);
                    return 1;
                }
            };
            let client = match BymaClient::new(&feed) {
                Ok(client) => client,
                Err(err) => {
                    error!("Failed to build feed client: {}", err);
                    return 1;
                }
            };
            let state_store = StateStore::new(&args.state);
            let notifier = Notifier::new(bot);

            info!("Watching every {} s", interval);
            loop {
                if let Err(err) = run_cycle(&client, &rules_store, &state_store, &notifier).await {
                    // Transient failures must not kill the watcher.
                    warn!("Cycle failed: {}", err);
                }
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted, shutting down");
                        break;
                    }
                }
            }
            0
        }

        Cmd::Bot => {
            info!("Starting Telegram command bot");
            bot.run().await;
            0
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let code = run(args).await;
    if code != 0 {
        std::process::exit(code);
    }
}
