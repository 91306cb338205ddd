//! userdesk binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use userdesk::api::http::HttpBackend;
use userdesk::api::{ApiConfig, BACKEND_NAME, DEFAULT_API_URL};
use userdesk::app::{self, AppState, Theme, keymap::Keymap};

#[derive(Parser, Debug)]
#[command(name = "userdesk", version, about = "Manage users on a REST backend from the terminal")]
struct Cli {
    /// Base URL of the users API
    #[arg(long, default_value = DEFAULT_API_URL, env = "USERDESK_API_URL")]
    api_url: String,

    /// Backend name used as the `/api/{backend}/users` path segment
    #[arg(long, default_value = BACKEND_NAME, env = "USERDESK_BACKEND")]
    backend: String,

    /// Directory holding theme.conf and keybinds.conf
    #[arg(long, env = "USERDESK_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (defaults to userdesk.log in the config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Route `tracing` output to a file; stdout belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("userdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = app::config_dir(cli.config_dir.as_deref());
    if let Err(e) = std::fs::create_dir_all(&config_dir) {
        eprintln!("warning: cannot create {}: {e}", config_dir.display());
    }
    let log_file = cli.log_file.clone().unwrap_or_else(|| config_dir.join("userdesk.log"));
    if let Err(e) = init_logging(&log_file) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let api = ApiConfig::new(cli.api_url, cli.backend);
    let backend = HttpBackend::new(api.clone()).context("build HTTP client")?;
    let state = AppState::new(Arc::new(backend), api)
        .with_theme(Theme::load_or_init(&config_dir.join("theme.conf")))
        .with_keymap(Keymap::load_or_init(&config_dir.join("keybinds.conf")));

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, state);
    restore_terminal(&mut terminal);

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
