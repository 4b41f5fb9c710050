//! Concierge TUI Entry Point
//!
//! Launches the terminal surface for the portfolio assistant.
//!
//! # Usage
//!
//! ```bash
//! # Gemini, API key from the environment
//! GEMINI_API_KEY=... concierge
//!
//! # Offline scripted replies, drawer already open
//! concierge --offline --open
//!
//! # Verbose logging (written to the log file, not the terminal)
//! RUST_LOG=debug concierge --log-file /tmp/concierge.log
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use concierge_core::{
    load_config_from_path, signal_bus, Concierge, ConciergeConfig, ConciergeMessage,
    ConfigOverrides, GeminiProvider, NotifyLevel, ResponseProvider, ScriptedProvider,
};
use concierge_tui::App;

/// Concierge - chat with a portfolio's digital twin in the terminal
#[derive(Parser, Debug)]
#[command(name = "concierge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "CONCIERGE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Answer with the offline scripted provider
    #[arg(long)]
    offline: bool,

    /// Gemini model to use
    #[arg(short = 'm', long, value_name = "NAME")]
    model: Option<String>,

    /// Seed for idle prompt draws
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Log file path
    #[arg(long, env = "CONCIERGE_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with the drawer open
    #[arg(long)]
    open: bool,
}

/// Get the default log file path
///
/// Uses the XDG state dir if available, otherwise the local data dir.
fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map_or_else(
            || PathBuf::from("concierge.log"),
            |dir| dir.join("concierge").join("concierge.log"),
        )
}

/// Initialize logging into `path`; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("concierge=info,concierge_tui=info,concierge_core=info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

/// Load configuration and apply command-line overrides
fn build_config(args: &Args) -> Result<ConciergeConfig> {
    let config_path = args
        .config
        .clone()
        .or_else(concierge_core::default_config_path);
    let mut config =
        load_config_from_path(config_path.as_deref()).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if args.offline {
        overrides = overrides.with_offline(true);
    }
    if let Some(model) = &args.model {
        overrides = overrides.with_model(model.clone());
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(source = %config.source(), offline = config.offline, "Configuration loaded");
    Ok(config)
}

/// Pick the provider that will answer
fn build_provider(config: &ConciergeConfig) -> Box<dyn ResponseProvider> {
    if config.use_scripted_provider() {
        Box::new(ScriptedProvider::default())
    } else {
        Box::new(GeminiProvider::new(config.provider.clone()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: concierge requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or use `ssh -t` when connecting remotely.");
        std::process::exit(1);
    }

    let config = build_config(&args)?;
    let (tx, rx) = mpsc::channel(100);
    let (emitter, listener) = signal_bus();

    if config.use_scripted_provider() && !config.offline {
        warn!("No API key configured, answering with the scripted provider");
        tx.send(ConciergeMessage::Notify {
            level: NotifyLevel::Warning,
            message: "No API key configured - answering offline".to_string(),
        })
        .await?;
    }

    let provider = build_provider(&config);
    let mut concierge = Concierge::new(provider, config, listener, tx);
    if let Some(seed) = args.seed {
        concierge = concierge.with_idle_seed(seed);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, concierge, rx, emitter, args.open).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Concierge exited with an error");
    }
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    concierge: Concierge<Box<dyn ResponseProvider>>,
    rx: mpsc::Receiver<ConciergeMessage>,
    emitter: concierge_core::SignalEmitter,
    open: bool,
) -> Result<()> {
    let mut app = App::new(concierge, rx, emitter)?.open_on_start(open);
    app.run(terminal).await?;

    // Show goodbye message after TUI closes
    if let Some(goodbye) = app.goodbye() {
        println!("\n\x1b[35m{}:\x1b[0m {}\n", app.assistant_name(), goodbye);
    }

    Ok(())
}
