//! citekit TUI
//!
//! Terminal UI for turning DOIs into citations.

mod app;
mod focus;
mod keybindings;
mod ui;

use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use citekit_core::config::HistoryConfig;
use citekit_core::{
    CitationFetcher, CitationResult, CitekitConfig, ClipboardService, FetchError, FetchTicket,
    FileStorage, HistoryStore, HttpClient, Osc52Clipboard,
};

use app::{App, Effect};

const TICK: Duration = Duration::from_millis(100);

type Completion = (FetchTicket, Result<CitationResult, FetchError>);

/// Log to `<data dir>/citekit-tui.log`; stdout belongs to the terminal.
fn init_logging(history: &HistoryConfig) {
    let Some(dir) = history.resolved_data_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::options()
        .create(true)
        .append(true)
        .open(dir.join("citekit-tui.log"))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CitekitConfig::load_default()?;
    init_logging(&config.history);

    let storage = FileStorage::from_config(&config.history)?;
    let history = HistoryStore::open(storage, &config.history)
        .with_max_authors(config.display.history_max_authors);
    let clipboard = ClipboardService::new(Osc52Clipboard, config.clipboard.ack_window());
    let fetcher = Arc::new(CitationFetcher::from_config(&config.api)?);
    tracing::info!(base_url = %config.api.base_url, "Starting citekit-tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(history, clipboard, config.display.default_style);
    let res = run_app(&mut terminal, &mut app, fetcher).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "citekit-tui exited with an error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<FileStorage, Osc52Clipboard>,
    fetcher: Arc<CitationFetcher<HttpClient>>,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        terminal.draw(|f| ui::render(app, f))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key.code, key.modifiers) {
                        Some(Effect::Quit) => return Ok(()),
                        Some(Effect::Fetch { ticket, doi }) => {
                            let fetcher = Arc::clone(&fetcher);
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let outcome = fetcher.fetch(&doi).await;
                                // Receiver is gone only after quit
                                let _ = tx.send((ticket, outcome));
                            });
                        }
                        Some(Effect::Copy { text, key, origin }) => {
                            app.copy(&text, &key, origin, Instant::now()).await;
                        }
                        None => {}
                    }
                }
            }
        }

        while let Ok((ticket, outcome)) = rx.try_recv() {
            app.finish_fetch(ticket, outcome);
        }
        app.tick(Instant::now());
    }
}
