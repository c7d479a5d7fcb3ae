//! freightdeck TUI — five-panel terminal dashboard over the schedule API.
//!
//! Panels:
//! 1. Schedules — cascading filters (vessel or origin path) and result rows
//! 2. Form — create/edit a schedule, with derived USA/Canada preview
//! 3. Transfer — Excel/CSV export and spreadsheet import
//! 4. Users — account list, invites, removal
//! 5. Help — keyboard shortcuts

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use freightdeck_core::api::{HttpApi, SessionStore};
use freightdeck_exchange::Config;

use crate::app::{AppState, ErrorCategory, Overlay, StatusLevel};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths and config
    let config = Config::load(&Config::default_path())?;
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freightdeck")
        .join("state.json");

    // Session + API client
    let session = SessionStore::load(Config::default_session_path());
    let logged_in = session.is_logged_in();
    let api = HttpApi::with_timeout(
        config.api.base_url.clone(),
        session,
        Duration::from_secs(config.api.timeout_secs),
    );

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, Box::new(api));

    // Build app state
    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        state_path.clone(),
        config.export.out_dir.display().to_string(),
        logged_in,
    );
    persistence::apply(&mut app, persisted);

    // A live session can fetch the root options straight away; otherwise
    // the login overlay triggers the fetch after sign-in.
    if logged_in {
        app.load_cascade_root();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::LoggedIn => {
            app.logged_in = true;
            app.login.in_flight = false;
            app.login.password.clear();
            app.overlay = Overlay::None;
            app.set_status("Signed in", StatusLevel::Info);
            app.load_cascade_root();
        }
        WorkerResponse::LoggedOut => {
            app.logged_in = false;
            app.overlay = Overlay::Login;
            app.set_status("Signed out", StatusLevel::Info);
        }
        WorkerResponse::SessionExpired => {
            app.on_session_expired();
        }
        WorkerResponse::OptionsLoaded {
            level,
            generation,
            options,
        } => {
            app.schedules.loading = false;
            // Stale generations are silently dropped by the cascade.
            if app.schedules.cascade.set_options(level, generation, options) {
                app.schedules.highlighted = 0;
            }
        }
        WorkerResponse::RowsLoaded { generation, rows } => {
            app.schedules.loading = false;
            let count = rows.len();
            if app.schedules.cascade.set_rows(generation, rows) {
                app.schedules.row_cursor = 0;
                app.set_status(format!("{count} schedules loaded"), StatusLevel::Info);
            }
        }
        WorkerResponse::ScheduleSaved { schedule, created } => {
            app.form.saving = false;
            if created {
                app.form.reset();
                app.set_status(
                    format!("Created schedule for {}", schedule.vessel_name),
                    StatusLevel::Info,
                );
            } else {
                app.set_status(
                    format!("Updated schedule {}", schedule.id),
                    StatusLevel::Info,
                );
            }
            // The visible rows may now be out of date.
            if app.schedules.cascade.is_complete() {
                app.refresh_rows();
            }
        }
        WorkerResponse::ScheduleDeleted { id } => {
            app.set_status(format!("Deleted schedule {id}"), StatusLevel::Info);
            if app.schedules.cascade.is_complete() {
                app.refresh_rows();
            }
        }
        WorkerResponse::ExportDone { files } => {
            app.transfer.in_flight = false;
            app.set_status(
                format!("Exported {} file(s)", files.len()),
                StatusLevel::Info,
            );
            app.transfer.last_files = files;
        }
        WorkerResponse::ImportDone { report } => {
            app.transfer.in_flight = false;
            let level = if report.failed == 0 {
                StatusLevel::Info
            } else {
                StatusLevel::Warning
            };
            app.set_status(
                format!(
                    "Import: {} created, {} updated, {} failed",
                    report.created, report.updated, report.failed
                ),
                level,
            );
            app.transfer.last_report = Some(report);
        }
        WorkerResponse::UsersLoaded { users } => {
            app.users.loading = false;
            app.users.cursor = 0;
            app.users.users = users;
        }
        WorkerResponse::UserSaved { user } => {
            app.set_status(format!("Invited {}", user.email), StatusLevel::Info);
            app.users.loading = true;
            let _ = app.worker_tx.send(WorkerCommand::FetchUsers);
        }
        WorkerResponse::UserDeleted { id } => {
            app.users.users.retain(|u| u.id != id);
            if app.users.cursor >= app.users.users.len() {
                app.users.cursor = app.users.users.len().saturating_sub(1);
            }
            app.set_status("User removed", StatusLevel::Info);
        }
        WorkerResponse::Error {
            category,
            message,
            context,
        } => {
            // In-flight flags must unwind no matter which command failed.
            app.schedules.loading = false;
            app.form.saving = false;
            app.transfer.in_flight = false;
            app.users.loading = false;
            app.login.in_flight = false;
            app.push_error(ErrorCategory::from_tag(&category), message, context);
        }
    }
}
