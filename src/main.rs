use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::info;

mod api;
mod app;
mod config;
mod fetch;
mod mock;
mod pager;
mod series;
mod telemetry;
mod types;
mod ui;

use crate::api::ApiClient;
use crate::app::App;
use crate::config::AppConfig;
use crate::fetch::{ApiEvent, ApiHandle};
use crate::mock::MockApi;

#[derive(Parser, Debug)]
#[command(name = "occupancy-dash")]
#[command(about = "Terminal dashboard for occupancy meter cameras")]
#[command(version = "0.1.0")]
struct Args {
    /// Backend base URL (overrides config.json)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Run against an in-process demo backend (no server required)
    #[arg(long, short)]
    demo: bool,

    /// Draw/tick interval in milliseconds (overrides config.json)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Log file path (overrides config.json)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(tick) = args.tick_ms {
        config.tick_ms = tick;
    }
    if let Some(path) = args.log_file {
        config.log_file = path.display().to_string();
    }

    telemetry::init_telemetry(Path::new(&config.log_file))?;
    info!(api_url = %config.api_url, demo = args.demo, "starting dashboard");

    let api = if args.demo {
        ApiHandle::Demo(Arc::new(MockApi::new()))
    } else {
        ApiHandle::Live(Arc::new(ApiClient::new(
            &config.api_url,
            Duration::from_millis(config.request_timeout_ms),
        )?))
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(api, tx, config.page_size);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(
        &mut terminal,
        app,
        rx,
        Duration::from_millis(config.tick_ms),
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    info!("dashboard stopped");
    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut rx: mpsc::UnboundedReceiver<ApiEvent>,
    tick: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Input first; completions are drained between frames so a slow
        // backend never holds up key handling.
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.apply_event(event);
        }
    }
}
