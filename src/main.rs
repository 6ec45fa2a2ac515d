//! marquee - browse movies and series from The Movie Database
//!
//! A terminal UI application with catalog pages, search, title details and a
//! personal watchlist.

use std::io;
use std::panic;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use marquee::app::App;
use marquee::cache::DiskCache;
use marquee::cli::{Cli, StartupConfig};
use marquee::config::AppConfig;
use marquee::content::ContentManager;
use marquee::loader::LoaderHandle;
use marquee::tmdb::TmdbClient;
use marquee::watchlist::MyList;
use marquee::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment variables may come from a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Validate arguments before touching the terminal
    let startup_config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = logging::init(config.log_path().as_deref()) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(language = %config.tmdb.language, "starting marquee");

    let my_list = match config.my_list_path() {
        Some(path) => MyList::load(path),
        None => {
            warn!("no data directory, My List will not be saved");
            MyList::in_memory()
        }
    };

    let client = TmdbClient::new(&config.tmdb);
    let disk = config.cache_dir.clone().map(DiskCache::with_dir);
    let manager = ContentManager::new(client, config.memory_ttl, disk, config.disk_ttl);
    let mut loader = LoaderHandle::spawn(Arc::new(manager));

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(my_list, startup_config);

    // Main event loop
    loop {
        for request in app.take_requests() {
            if !loader.request(request) {
                warn!("loader stopped, request dropped");
            }
        }

        while let Some(message) = loader.try_recv() {
            app.apply(message, Instant::now());
        }

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }

        app.tick(Instant::now());

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("marquee stopped");
    Ok(())
}
