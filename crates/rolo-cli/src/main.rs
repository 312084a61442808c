//! `rolo`: terminal UI for the Rolo contact service.
//!
//! # Usage
//!
//! ```
//! rolo --url http://localhost:5001
//! rolo --config ~/.config/rolo/config.toml --export ~/contacts.pdf
//! ```

mod app;
mod client;
mod export;
mod form;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5001";
const DEFAULT_EXPORT: &str = "contacts.pdf";
const LOG_FILE: &str = "rolo.log";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolo", about = "Terminal UI for the Rolo contact service")]
struct Args {
  /// Path to a TOML config file (url, export).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rolo server (default: http://localhost:5001).
  #[arg(long, env = "ROLO_URL")]
  url: Option<String>,

  /// Where the PDF export is written (default: contacts.pdf).
  #[arg(long, env = "ROLO_EXPORT", value_name = "FILE")]
  export: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq)]
struct ConfigFile {
  #[serde(default)]
  url:    Option<String>,
  #[serde(default)]
  export: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_logging()?;

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or(file_cfg.url)
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let export_path = args
    .export
    .or(file_cfg.export)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT));

  tracing::info!(url = %api_config.base_url, "starting rolo");
  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, export_path);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data. A failure is shown in the status bar; the user can
  // retry with `r`.
  let _ = app.load_contacts().await;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

/// Log to a file; stdout belongs to the TUI.
fn init_logging() -> Result<()> {
  let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A queued save runs after its "Saving…" frame is on screen. Keys typed
    // while it was in flight are dropped.
    if app.has_pending() && app.submitting {
      app.run_pending().await;
      discard_input()?;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      let cont = app.handle_key(key).await?;
      if !cont {
        break;
      }
    }
  }

  Ok(())
}

fn discard_input() -> io::Result<()> {
  while event::poll(Duration::ZERO)? {
    event::read()?;
  }
  Ok(())
}
