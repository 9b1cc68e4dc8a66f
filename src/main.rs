use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scrapegate::chat::{ChatHandler, OfflineResponder};
use scrapegate::config::ScrapeConfig;
use scrapegate::fetch::Fetcher;
use scrapegate::ratelimit::RateGate;

/// Log output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Chat with scrape support: `scrape <url>` fetches a page preview.
#[derive(Parser, Debug)]
#[command(name = "scrapegate", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Message to handle once; reads messages from stdin when omitted
    message: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match args.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    info!("Starting scrapegate");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => ScrapeConfig::from_file(path)?,
        None => ScrapeConfig::default(),
    };
    info!(
        min_spacing_ms = config.gate.min_spacing_ms,
        max_calls_per_window = config.gate.max_calls_per_window,
        window_secs = config.gate.window_secs,
        timeout_secs = config.fetch.timeout_secs,
        "Configuration loaded"
    );

    let gate = Arc::new(RateGate::new(&config.gate));
    let fetcher = Arc::new(Fetcher::new(&config.fetch, gate)?);
    let handler = ChatHandler::new(
        fetcher,
        Arc::new(OfflineResponder),
        config.fetch.preview_length,
    );

    if !args.message.is_empty() {
        let message = args.message.join(" ");
        println!("{}", handler.handle(&message).await);
        return Ok(());
    }

    tokio::select! {
        result = chat_loop(&handler) => result?,
        signal = stop_signal() => {
            let signal = signal?;
            info!(signal, "Stopping stdin chat loop");
        }
    }

    info!("scrapegate stopped");
    Ok(())
}

/// Answer one message per stdin line until EOF.
async fn chat_loop(handler: &ChatHandler<OfflineResponder>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Blank lines are answered too; they reach the responder as empty questions
    while let Some(line) = lines.next_line().await? {
        println!("{}", handler.handle(&line).await);
    }

    Ok(())
}

/// Resolve with the name of the first stop signal the process receives.
async fn stop_signal() -> anyhow::Result<&'static str> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result.map(|_| "Ctrl+C").map_err(Into::into),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        Ok("Ctrl+C")
    }
}
