//! Restoview - browse restaurants and their reviews in the terminal
//!
//! A terminal UI application that lists restaurants from a review backend,
//! keeps a local copy for offline use, and queues reviews written offline
//! until the backend is reachable again.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use restoview::app::{App, AppState};
use restoview::cache::{LocalStore, PendingQueue};
use restoview::cli::{Cli, StartupConfig};
use restoview::data::{HttpApi, RestaurantApi};
use restoview::refresh::{self, RefreshConfig, RefreshHandle};
use restoview::repository::Repository;
use restoview::ui;

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

/// Sends tracing output to the log file, the terminal belongs to the UI
fn setup_logging(config: &StartupConfig) -> io::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)
}

/// Renders the UI based on the current application state
fn render_ui<A>(frame: &mut ratatui::Frame, app: &App<A>) {
    match &app.state {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::RestaurantList => {
            ui::render_restaurant_list(frame, app);
        }
        AppState::RestaurantDetail(_) => {
            ui::render_restaurant_detail(frame, app);
        }
        AppState::ReviewForm(_) => {
            ui::render_restaurant_detail(frame, app);
            ui::render_review_form(frame, app);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading restaurants...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Posts saved reviews and reports the outcome on stdout
async fn run_sync(repository: &Repository<HttpApi>) -> ExitCode {
    let waiting = repository.pending_count();
    match repository.post_saved_reviews().await {
        Ok(sent) => {
            println!("Posted {} saved review(s)", sent);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let left = repository.pending_count();
            eprintln!(
                "Posted {} of {} saved review(s): {}",
                waiting.saturating_sub(left),
                waiting,
                e
            );
            ExitCode::FAILURE
        }
    }
}

async fn run_tui(
    repository: Repository<HttpApi>,
    config: &StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let api = repository.api().clone();
    let mut app = App::new(repository, config);

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &app))?;

    let online = !config.offline && api.is_reachable().await;
    app.online = online;
    let mut monitor = RefreshHandle::spawn(
        api,
        online,
        RefreshConfig {
            enabled: !config.offline,
            ..Default::default()
        },
    );

    // Trigger initial data load
    app.load().await;

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if let Some(action) = app.take_action() {
            app.perform(action).await;
        }

        while let Some(message) = refresh::try_recv(&mut monitor) {
            app.handle_refresh(message).await;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    monitor.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = setup_logging(&config) {
        eprintln!("Error: could not open log file {}: {}", config.log_path().display(), e);
        return ExitCode::FAILURE;
    }

    let api = match HttpApi::new(config.api_url.clone(), config.timeout) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let repository = Repository::new(
        api,
        LocalStore::with_dir(config.cache_dir.clone()),
        PendingQueue::with_dir(&config.data_dir),
    );
    tracing::info!(api_url = %config.api_url, offline = config.offline, "starting");

    if config.sync_only {
        return run_sync(&repository).await;
    }

    match run_tui(repository, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
