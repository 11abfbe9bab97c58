//! directory-console binary entry point.
//!
//! Reads settings, sets up file logging and the tokio runtime, initializes
//! the terminal in raw mode, runs the event loop, and restores the terminal
//! state on exit.
//!
use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use directory_console::api::DirectoryClient;
use directory_console::app::dispatch::Dispatcher;
use directory_console::app::keymap::Keymap;
use directory_console::app::theme::Theme;
use directory_console::app::{self, AppState};
use directory_console::config::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(name = "directory-console", version, about = "Terminal console for directory accounts and roles")]
struct Cli {
    /// Settings file, created with defaults when missing.
    #[arg(long, default_value = "console.conf")]
    config: String,
    /// Root URL of the directory API.
    #[arg(long, env = "DIRECTORY_API_URL")]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    log_file: Option<String>,
    #[arg(long, default_value = "theme.conf")]
    theme: String,
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,
    /// Probe the API once, print the result and exit.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn settings(&self) -> ConsoleConfig {
        let mut cfg = ConsoleConfig::load_or_init(&self.config);
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs.filter(|s| *s > 0) {
            cfg.timeout_secs = secs;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = path.clone();
        }
        cfg
    }
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging(cfg: &ConsoleConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)
        .with_context(|| format!("open log file {}", cfg.log_file))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn check(runtime: &tokio::runtime::Runtime, client: &DirectoryClient) -> Result<()> {
    let report = runtime
        .block_on(client.health())
        .with_context(|| format!("health check against {}", client.base_url()))?;
    println!(
        "{}: status={} platform_connected={}",
        client.base_url(),
        report.status,
        report.platform_connected
    );
    if !report.is_healthy() {
        anyhow::bail!("backend reports status '{}'", report.status);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = cli.settings();
    init_logging(&cfg)?;
    tracing::info!(base_url = %cfg.base_url, timeout_secs = cfg.timeout_secs, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let client = DirectoryClient::new(&cfg.base_url, cfg.timeout()).context("configure API client")?;

    if cli.check {
        return check(&runtime, &client);
    }

    let theme = Theme::load_or_init(&cli.theme);
    let keymap = Keymap::load_or_init(&cli.keybinds);
    let mut state = AppState::new(&cfg, theme, keymap);
    let (dispatcher, mut completions) = Dispatcher::new(client, runtime.handle().clone());

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &dispatcher, &mut completions);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        tracing::error!(error = %err, "console exited with an error");
        eprintln!("application error: {err:#}");
    }
    res
}
