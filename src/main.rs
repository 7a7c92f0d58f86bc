mod app;
mod config;
mod page;
mod replay;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{App, Popup};
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "blogfx")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "Blog page interactions in the terminal, live or from a replay script")]
struct Args {
    /// Play a JSON event script and print the final page snapshot
    #[arg(short, long, value_name = "SCRIPT")]
    replay: Option<PathBuf>,

    /// Pace the replay in wall-clock time instead of running it instantly
    #[arg(long, requires = "replay")]
    realtime: bool,

    /// Stop the replay clock at this time (ms) instead of draining timers
    #[arg(long, value_name = "MS", requires = "replay")]
    until: Option<u64>,

    /// Use this config file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The TUI owns the terminal, so its logs go to a file
    let tui = args.replay.is_none() && !args.dump_config;
    init_logging(tui);

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(path) = &args.replay {
        return run_replay(&config, path, args.until, args.realtime).await;
    }

    // Run TUI
    run_tui(&config).await
}

fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = if to_file {
        match open_log_file() {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let stderr_layer = if to_file {
        None
    } else {
        Some(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

fn open_log_file() -> Result<File> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
        .join("blogfx");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join("blogfx.log");
    File::create(&path).with_context(|| format!("Failed to create {}", path.display()))
}

async fn run_replay(config: &AppConfig, path: &Path, until: Option<u64>, realtime: bool) -> Result<()> {
    let steps = replay::load_script(path)?;
    tracing::info!("Replaying {} steps from {}", steps.len(), path.display());

    let mut page = page::Page::new(config)?;
    replay::run(&mut page, &steps, until, realtime).await;

    println!("{}", serde_json::to_string_pretty(&page.snapshot())?);
    Ok(())
}

async fn run_tui(config: &AppConfig) -> Result<()> {
    ui::set_theme(theme::Theme::from_config(&config.theme));

    // Create app state before touching the terminal
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Short poll keeps counters and fades smooth
        if event::poll(std::time::Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Advance the page clock
        app.tick()?;
        tokio::task::yield_now().await;
    }
}
