mod config;
mod id;
mod storage;
mod store;
mod task;
mod ui;

use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;
use storage::FileStorage;
use store::TaskStore;
use tracing_subscriber::EnvFilter;

/// Log to a file in the data directory; the UI owns the terminal, so
/// nothing may write to stdout or stderr while it runs.
fn init_logging(config: &Config) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to open log file: {err}");
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .compact()
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    if let Err(err) = std::fs::create_dir_all(&config.data_dir) {
        eprintln!(
            "Failed to create data directory {}: {err}",
            config.data_dir.display()
        );
    }
    init_logging(&config);

    let storage = FileStorage::new(config.data_dir.clone());
    let mut store = TaskStore::load(storage);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{err:?}");
    }
    Ok(())
}
