mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hourcast::app::{App, FetchOutcome, ForecastFocus, Screen, SettingsField};
use hourcast::config::Config;
use hourcast::datasources::OpenMeteoClient;
use hourcast::db::Database;
use hourcast::logic::{current_theme, select_current, ForecastService, InsightEngine};
use hourcast::models::settings::set_allow_unsuitable_tasks;
use hourcast::models::{Location, Settings, Tier};
use hourcast::ui::screens::{ForecastScreen, SettingsScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    match cli.command {
        Some(Commands::Init) => {
            init_logging(cli.verbose, None);
            Config::setup_interactive().context("Setup failed")?;
            Ok(())
        }
        Some(Commands::Check) => {
            init_logging(cli.verbose, None);
            run_check(&cli).await
        }
        Some(Commands::Preview {
            ref name,
            ref lat,
            ref lon,
        }) => {
            init_logging(cli.verbose, None);
            run_preview(&cli, name.as_deref(), lat.as_deref(), lon.as_deref()).await
        }
        Some(Commands::AllowUnsuitable { value }) => {
            init_logging(cli.verbose, None);
            let db = open_database(cli.data_dir.as_ref())?;
            set_allow_unsuitable_tasks(&db, value).context("Failed to save setting")?;
            println!(
                "Tasks in unsuitable hours are now {}",
                if value { "allowed" } else { "blocked" }
            );
            Ok(())
        }
        None => run_tui(&cli).await,
    }
}

/// Logs go to stderr for plain commands and to a file while the TUI owns the terminal.
fn init_logging(verbose: u8, log_file: Option<&Path>) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = log_file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

fn open_database(data_dir: Option<&std::path::PathBuf>) -> anyhow::Result<Database> {
    let db_path = Config::db_path(data_dir).context("Failed to resolve data directory")?;
    Database::open(&db_path).with_context(|| format!("Failed to open database at {:?}", db_path))
}

async fn run_check(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.clone()).context("Configuration error")?;
    println!("Config: OK");

    let location = config.location.to_location()?;
    println!("Location: {}", location);

    let db = open_database(cli.data_dir.as_ref())?;
    println!(
        "Database: {} ({} hour slots with tasks)",
        db.path().display(),
        db.task_slot_count()?
    );

    let client = OpenMeteoClient::new(config.openmeteo.clone())?;
    match client.test_connection(&location).await {
        Ok(true) => println!("Open-Meteo: OK"),
        Ok(false) => println!("Open-Meteo: ERROR (unexpected status)"),
        Err(e) => println!("Open-Meteo: OFFLINE ({})", e),
    }

    let rules = InsightEngine::new().list_rules();
    println!("Alert rules: {}", rules.len());
    for (id, name) in rules {
        println!("  {:<18} {}", id, name);
    }

    Ok(())
}

async fn run_preview(
    cli: &Cli,
    name: Option<&str>,
    lat: Option<&str>,
    lon: Option<&str>,
) -> anyhow::Result<()> {
    let config = Config::load(cli.config.clone()).context("Configuration error")?;
    let db = open_database(cli.data_dir.as_ref())?;
    let settings = Settings::load(&db, config.tasks.allow_unsuitable);

    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Location::parse(name.unwrap_or("Custom"), lat, lon)?,
        _ => match settings.default_location {
            Some(location) => location,
            None => config.location.to_location()?,
        },
    };

    let client = OpenMeteoClient::new(config.openmeteo.clone())?;
    let service = ForecastService::new(db);
    let snapshot = service
        .refresh(&client, &location, 1)
        .await
        .with_context(|| format!("No forecast for {}", location))?;

    let current = select_current(&snapshot.records, chrono::Local::now().naive_local());
    println!("{}", snapshot.location);
    println!(
        "Current hour: {}  Theme: {}",
        current
            .map(|r| r.time_label())
            .unwrap_or_else(|| "-".to_string()),
        current_theme(current)
    );
    println!();

    for record in &snapshot.records {
        let tasks = if record.tasks.is_empty() {
            String::new()
        } else {
            format!("  [{}]", record.tasks.join(", "))
        };
        println!(
            "{}  {:>4}  {}  {}{}",
            record.time_label(),
            record.display_temp(),
            record.icon.symbol(),
            record.condition_label,
            tasks
        );
    }

    println!();
    println!("Task windows:");
    if snapshot.insights.recommendations.is_empty() {
        println!("  none");
    }
    for item in &snapshot.insights.recommendations {
        println!("  {} {}", item.kind.symbol(), item.message);
    }

    println!("Alerts:");
    if snapshot.insights.anomalies.is_empty() {
        println!("  none");
    }
    for item in &snapshot.insights.anomalies {
        println!("  {} {}", item.kind.symbol(), item.message);
    }

    Ok(())
}

async fn run_tui(cli: &Cli) -> anyhow::Result<()> {
    let data_dir = Config::data_dir(cli.data_dir.as_ref()).context("Failed to resolve data directory")?;
    init_logging(cli.verbose, Some(&data_dir.join("hourcast.log")));

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `hourcast init` to create a configuration.");
            std::process::exit(1);
        }
    };

    let db = open_database(Some(&data_dir))?;
    let client = Arc::new(OpenMeteoClient::new(config.openmeteo.clone())?);
    let mut app = App::new(config, db)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: Arc<OpenMeteoClient>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();

    loop {
        // Apply finished fetches; stale ones are dropped by the app
        while let Ok(outcome) = rx.try_recv() {
            app.apply_fetch(outcome);
        }

        if app.needs_refresh {
            if let Some((generation, location)) = app.start_refresh() {
                let client = Arc::clone(&client);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client.fetch_forecast(&location).await;
                    let _ = tx.send(FetchOutcome {
                        generation,
                        location,
                        result,
                    });
                });
            }
        }

        // Draw UI
        let allow_unsuitable = app.allow_unsuitable();
        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Forecast => {
                    let hours = app.visible_records();
                    let current = app.current_record();
                    let screen = ForecastScreen::new(&app.location, &hours, &app.insights)
                        .with_current(current, current_theme(current))
                        .with_selection(
                            app.forecast_state.selected_index,
                            app.forecast_state.task_index,
                            app.forecast_state.focus,
                        )
                        .with_filter(app.forecast_state.filter)
                        .with_status(
                            app.fetched_at,
                            app.blocking_error.as_deref(),
                            app.status_message.as_deref(),
                            app.refreshing,
                        )
                        .with_preferences(allow_unsuitable, app.settings.dark_mode);
                    f.render_widget(screen, area);
                }
                Screen::Settings => {
                    let screen = SettingsScreen::new(&app.settings, &app.settings_state.location)
                        .with_allow_unsuitable(allow_unsuitable)
                        .with_focus(app.settings_state.focused_field)
                        .editing(app.settings_state.editing, &app.settings_state.edit_buffer)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let editing = app.is_editing();
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    _ if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        handle_screen_input(app, key.code, key.modifiers);
                    }
                    KeyCode::Char('q') if !editing => {
                        app.quit();
                    }
                    KeyCode::Esc if !editing => {
                        app.switch_screen(Screen::Forecast);
                    }
                    KeyCode::Char(c) if !editing => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        } else {
                            handle_screen_input(app, key.code, key.modifiers);
                        }
                    }
                    _ => {
                        handle_screen_input(app, key.code, key.modifiers);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match app.screen {
        Screen::Forecast => handle_forecast_input(app, code),
        Screen::Settings => handle_settings_input(app, code, modifiers),
    }
}

fn handle_forecast_input(app: &mut App, code: KeyCode) {
    if app.forecast_state.focus == ForecastFocus::Draft {
        match code {
            KeyCode::Esc => app.forecast_state.focus = ForecastFocus::Hours,
            KeyCode::Enter => app.submit_draft(),
            KeyCode::Backspace => app.pop_draft_char(),
            KeyCode::Char(c) => app.push_draft_char(c),
            KeyCode::Tab => app.forecast_state.focus = app.forecast_state.focus.next(),
            _ => {}
        }
        return;
    }

    let hour_count = app.visible_records().len();
    let task_count = app.selected_record().map(|r| r.tasks.len()).unwrap_or(0);

    match code {
        KeyCode::Up => match app.forecast_state.focus {
            ForecastFocus::Tasks => app.forecast_state.prev_task(),
            _ => app.forecast_state.prev(),
        },
        KeyCode::Down => match app.forecast_state.focus {
            ForecastFocus::Tasks => app.forecast_state.next_task(task_count),
            _ => app.forecast_state.next(hour_count),
        },
        KeyCode::Tab => app.forecast_state.focus = app.forecast_state.focus.next(),
        KeyCode::Enter | KeyCode::Char('a') => app.forecast_state.focus = ForecastFocus::Draft,
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_task(),
        KeyCode::Char('g') => app.toggle_tier(Tier::Good),
        KeyCode::Char('b') => app.toggle_tier(Tier::Bad),
        KeyCode::Char('u') => app.toggle_tier(Tier::Unsuitable),
        KeyCode::Char('r') => app.request_refresh(),
        _ => {}
    }
}

fn handle_settings_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.settings_state.editing {
        match code {
            KeyCode::Esc => app.settings_state.cancel_editing(),
            KeyCode::Enter => app.settings_state.finish_editing(),
            KeyCode::Backspace => {
                app.settings_state.edit_buffer.pop();
            }
            KeyCode::Char(c) => app.settings_state.edit_buffer.push(c),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Up => app.settings_state.prev_field(),
        KeyCode::Down | KeyCode::Tab => app.settings_state.next_field(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let result = match app.settings_state.focused_field {
                SettingsField::AllowUnsuitable => app.toggle_allow_unsuitable(),
                SettingsField::DarkMode => app.toggle_dark_mode(),
                _ => {
                    app.settings_state.start_editing();
                    Ok(())
                }
            };
            if let Err(e) = result {
                app.set_status(&format!("Saving settings failed: {}", e));
            }
        }
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            match app.save_location() {
                Ok(()) => app.set_status("Default location saved"),
                Err(e) => app.set_status(&e.to_string()),
            }
        }
        _ => {}
    }
}
