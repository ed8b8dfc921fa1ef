//! Duel TUI Entry Point
//!
//! Launches the terminal UI for the philosophical duel.
//!
//! Usage:
//!   duel-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>       Configuration file
//!   --speed <FACTOR>          Choreography speed (2.0 = twice as fast)
//!   --export-dir <DIR>        Where whiteboard PNGs are written
//!   --log-file <FILE>         Write logs here (the terminal is busy)

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duel_core::{default_config_path, load_config_from_path, ConfigOverrides, DuelConfig};
use duel_tui::App;

/// Philosophical Duel - watch two philosophers debate in your terminal
#[derive(Parser, Debug)]
#[command(name = "duel-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "DUEL_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (logs are discarded when unset)
    #[arg(long, env = "DUEL_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Choreography speed factor
    #[arg(long, value_name = "FACTOR")]
    speed: Option<f64>,

    /// Whiteboard export directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Whiteboard canvas width in pixels
    #[arg(long, value_name = "PX", requires = "canvas_height")]
    canvas_width: Option<u32>,

    /// Whiteboard canvas height in pixels
    #[arg(long, value_name = "PX", requires = "canvas_width")]
    canvas_height: Option<u32>,

    /// Frame interval in milliseconds
    #[arg(long, value_name = "MS")]
    frame_ms: Option<u64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(speed) = self.speed {
            overrides = overrides.with_speed(speed);
        }
        if let Some(dir) = &self.export_dir {
            overrides = overrides.with_export_dir(dir.clone());
        }
        if let (Some(width), Some(height)) = (self.canvas_width, self.canvas_height) {
            overrides = overrides.with_canvas_size(width, height);
        }
        if let Some(ms) = self.frame_ms {
            overrides = overrides.with_frame_ms(ms);
        }
        overrides
    }
}

/// Initialize logging into `path`, or nowhere
fn init_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DuelConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path)?;
    args.overrides().apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = load_config(&args)?;
    tracing::info!(
        source = %config.source(),
        speed = config.speed,
        export_dir = %config.whiteboard.export_dir.display(),
        "Configuration loaded"
    );

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: duel-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(Some(goodbye)) => {
            println!("\n\x1b[32mThe Duel:\x1b[0m {goodbye}\n");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &DuelConfig,
) -> anyhow::Result<Option<String>> {
    let mut app = App::new(config)?;
    app.run(terminal).await?;
    Ok(app.goodbye().map(str::to_string))
}
