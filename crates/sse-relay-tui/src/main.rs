//! # sse-relay-tui
//!
//! Terminal front-end for the SSE message relay. Submit a message, watch the
//! relay stream it back, and read the event log, either full-screen or as a
//! one-shot command.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::event::EventStream;
use futures_util::StreamExt;
use sse_relay_client::{EventLog, RelayClient, RelayConfig, StreamFormController};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod app;
mod event;
mod tui;
mod ui;

use app::App;
use event::AppEvent;
use tui::Tui;

/// Frame rate of the full-screen UI.
const TICK_RATE: Duration = Duration::from_millis(250);

type BoxError = Box<dyn std::error::Error>;

/// Terminal front-end for the SSE message relay.
#[derive(Parser)]
#[command(name = "sse-relay-tui", version, about)]
struct Cli {
    /// Path to sse-relay.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relay base URL override
    #[arg(long)]
    url: Option<String>,

    /// Enable verbose logging (set RUST_LOG for fine-grained control)
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file (the full-screen UI logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive full-screen UI (default)
    Tui,
    /// Submit one message and print the stream until it closes
    Send {
        message: String,
        /// Give up waiting for the stream after this many seconds
        #[arg(long, default_value_t = 30)]
        wait_secs: u64,
    },
    /// Check that the relay is up
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    init_logging(
        cli.verbose,
        cli.log_file.as_deref(),
        matches!(command, Command::Tui),
    )?;

    let mut config = RelayConfig::discover(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    tracing::debug!(base_url = %config.base_url, "Configuration loaded");

    match command {
        Command::Tui => run_tui(&config).await,
        Command::Send { message, wait_secs } => {
            run_send(&config, &message, Duration::from_secs(wait_secs)).await
        }
        Command::Ping => run_ping(&config).await,
    }
}

/// Install the tracing subscriber.
///
/// The full-screen UI owns stdout and stderr, so it only logs when a log
/// file is given.
fn init_logging(verbose: bool, log_file: Option<&Path>, fullscreen: bool) -> Result<(), BoxError> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("sse_relay_client=debug,sse_relay_tui=debug")
            } else {
                EnvFilter::new("sse_relay_client=warn")
            }
        })
    };

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if fullscreen => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

// ─── Full-screen UI ─────────────────────────────────────────────────────

async fn run_tui(config: &RelayConfig) -> Result<(), BoxError> {
    let controller = StreamFormController::from_config(config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    // SIGINT only arrives outside raw mode, e.g. from `kill -INT`.
    let signal_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = signal_tx.send(AppEvent::Quit);
        }
    });

    let mut app = App::new(controller, tx);
    let mut tui = Tui::enter()?;
    let mut terminal_events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);

    tracing::info!(base_url = %app.controller.client().base_url(), "TUI started");

    loop {
        tui.terminal.draw(|frame| ui::draw(frame, &app))?;

        let event = tokio::select! {
            Some(event) = rx.recv() => event,
            Some(Ok(event)) = terminal_events.next() => AppEvent::Terminal(event),
            _ = tick.tick() => AppEvent::Tick,
            // Already applied by the controller; just redraw.
            Some(_) = app.controller.pump() => continue,
        };

        if app.handle_event(event) {
            break;
        }
    }

    app.controller.shutdown();
    tui.exit()?;
    tracing::info!("TUI exited");
    Ok(())
}

// ─── One-shot commands ──────────────────────────────────────────────────

/// Print log entries pushed since `seen` and advance it.
fn print_new(log: &EventLog, seen: &mut u64) {
    for entry in log.since(*seen) {
        println!("{}", entry.render());
    }
    *seen = log.total_pushed();
}

async fn run_send(config: &RelayConfig, message: &str, wait: Duration) -> Result<(), BoxError> {
    let mut controller = StreamFormController::from_config(config)?;
    let mut seen = 0;

    let submitted = controller.submit(message).await;
    print_new(controller.log(), &mut seen);
    submitted?;

    let deadline = tokio::time::sleep(wait);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            event = controller.pump() => {
                print_new(controller.log(), &mut seen);
                match event {
                    Some(event) if !event.is_terminal() => {}
                    _ => break,
                }
            }
            () = &mut deadline => {
                eprintln!("No close event within {}s; giving up.", wait.as_secs());
                break;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!("{}", controller.status().text);
    controller.shutdown();
    Ok(())
}

async fn run_ping(config: &RelayConfig) -> Result<(), BoxError> {
    let client = RelayClient::new(config)?;
    let pong = client.ping().await?;
    println!(
        "{} {}: {}",
        client.base_url(),
        pong.status,
        pong.message.as_deref().unwrap_or("-")
    );
    if !pong.is_ok() {
        return Err(format!("relay reported status {:?}", pong.status).into());
    }
    Ok(())
}
