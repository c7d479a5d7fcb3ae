//! Background worker thread — every network call runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Cascade
//! fetches carry the generation tag taken at dispatch; the main thread
//! feeds it back into the cascade, which drops anything stale.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use freightdeck_core::api::{ApiError, DestinationScope, ScheduleApi};
use freightdeck_core::cascade::ScheduleQuery;
use freightdeck_core::domain::{Schedule, ScheduleDraft, SelectOption, User};
use freightdeck_core::schema::{InviteRequest, UploadMode, UploadReport};
use freightdeck_exchange::{export_bulk, export_per_port, export_template, upload_file, write_csv};

use crate::app::ExportKind;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Login {
        email: String,
        password: String,
    },
    Logout,
    FetchOptions {
        level: usize,
        generation: u64,
        request: OptionsRequest,
    },
    FetchRows {
        generation: u64,
        query: ScheduleQuery,
    },
    SaveSchedule {
        id: Option<String>,
        draft: ScheduleDraft,
    },
    DeleteSchedule {
        id: String,
    },
    Export {
        kind: ExportKind,
        csv: bool,
        out_dir: PathBuf,
    },
    Import {
        path: PathBuf,
        overwrite: bool,
        mode: UploadMode,
    },
    FetchUsers,
    InviteUser {
        invite: InviteRequest,
    },
    DeleteUser {
        id: String,
    },
    Shutdown,
}

/// Which option list a cascade level needs.
#[derive(Debug, Clone)]
pub enum OptionsRequest {
    Vessels,
    Countries,
    Voyages {
        vessel_id: String,
    },
    Transits {
        vessel_id: String,
        voyage: String,
    },
    VesselDestinations {
        vessel_id: String,
        voyage: String,
        transit: String,
    },
    Ports {
        country_id: String,
    },
    /// Origin-path destinations are keyed by transit hub + country; the
    /// worker resolves the selected port to its transit hub first.
    OriginDestinations {
        country_id: String,
        port_id: String,
    },
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    LoggedIn,
    LoggedOut,
    SessionExpired,
    OptionsLoaded {
        level: usize,
        generation: u64,
        options: Vec<SelectOption>,
    },
    RowsLoaded {
        generation: u64,
        rows: Vec<Schedule>,
    },
    ScheduleSaved {
        schedule: Schedule,
        created: bool,
    },
    ScheduleDeleted {
        id: String,
    },
    ExportDone {
        files: Vec<PathBuf>,
    },
    ImportDone {
        report: UploadReport,
    },
    UsersLoaded {
        users: Vec<User>,
    },
    UserSaved {
        user: User,
    },
    UserDeleted {
        id: String,
    },
    Error {
        category: String,
        message: String,
        context: String,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    api: Box<dyn ScheduleApi>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("freightdeck-worker".into())
        .spawn(move || {
            worker_loop(rx, tx, api.as_ref());
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, api: &dyn ScheduleApi) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(cmd, &tx, api),
        }
    }
}

fn handle_command(cmd: WorkerCommand, tx: &Sender<WorkerResponse>, api: &dyn ScheduleApi) {
    match cmd {
        WorkerCommand::Login { email, password } => match api.login(&email, &password) {
            Ok(()) => {
                let _ = tx.send(WorkerResponse::LoggedIn);
            }
            Err(e) => send_error(tx, "login", e),
        },
        WorkerCommand::Logout => {
            let _ = api.logout();
            let _ = tx.send(WorkerResponse::LoggedOut);
        }
        WorkerCommand::FetchOptions {
            level,
            generation,
            request,
        } => match fetch_options(api, &request) {
            Ok(options) => {
                let _ = tx.send(WorkerResponse::OptionsLoaded {
                    level,
                    generation,
                    options,
                });
            }
            Err(e) => send_error(tx, "filter options", e),
        },
        WorkerCommand::FetchRows { generation, query } => match api.schedules(Some(&query)) {
            Ok(rows) => {
                let _ = tx.send(WorkerResponse::RowsLoaded { generation, rows });
            }
            Err(e) => send_error(tx, "schedule list", e),
        },
        WorkerCommand::SaveSchedule { id, draft } => {
            let result = match &id {
                Some(id) => api.update_schedule(id, &draft).map(|s| (s, false)),
                None => api.create_schedule(&draft).map(|s| (s, true)),
            };
            match result {
                Ok((schedule, created)) => {
                    let _ = tx.send(WorkerResponse::ScheduleSaved { schedule, created });
                }
                Err(e) => send_error(tx, "schedule save", e),
            }
        }
        WorkerCommand::DeleteSchedule { id } => match api.delete_schedule(&id) {
            Ok(()) => {
                let _ = tx.send(WorkerResponse::ScheduleDeleted { id });
            }
            Err(e) => send_error(tx, "schedule delete", e),
        },
        WorkerCommand::Export { kind, csv, out_dir } => {
            handle_export(api, kind, csv, &out_dir, tx)
        }
        WorkerCommand::Import {
            path,
            overwrite,
            mode,
        } => match upload_file(api, &path, overwrite, mode) {
            Ok(report) => {
                let _ = tx.send(WorkerResponse::ImportDone { report });
            }
            Err(freightdeck_exchange::ExchangeError::Api(e)) => send_error(tx, "import", e),
            Err(e) => {
                let _ = tx.send(WorkerResponse::Error {
                    category: "other".into(),
                    message: e.to_string(),
                    context: "import".into(),
                });
            }
        },
        WorkerCommand::FetchUsers => match api.users() {
            Ok(users) => {
                let _ = tx.send(WorkerResponse::UsersLoaded { users });
            }
            Err(e) => send_error(tx, "user list", e),
        },
        WorkerCommand::InviteUser { invite } => match api.invite_user(&invite) {
            Ok(user) => {
                let _ = tx.send(WorkerResponse::UserSaved { user });
            }
            Err(e) => send_error(tx, "user invite", e),
        },
        WorkerCommand::DeleteUser { id } => match api.delete_user(&id) {
            Ok(()) => {
                let _ = tx.send(WorkerResponse::UserDeleted { id });
            }
            Err(e) => send_error(tx, "user delete", e),
        },
        WorkerCommand::Shutdown => {} // handled in loop
    }
}

fn fetch_options(
    api: &dyn ScheduleApi,
    request: &OptionsRequest,
) -> Result<Vec<SelectOption>, ApiError> {
    match request {
        OptionsRequest::Vessels => Ok(api
            .vessels()?
            .into_iter()
            .map(|v| SelectOption::new(v.id, v.name))
            .collect()),
        OptionsRequest::Countries => Ok(api
            .countries()?
            .into_iter()
            .map(|c| SelectOption::new(c.id, c.name))
            .collect()),
        OptionsRequest::Voyages { vessel_id } => {
            Ok(plain_options(api.voyages(vessel_id)?))
        }
        OptionsRequest::Transits { vessel_id, voyage } => {
            Ok(plain_options(api.transits(vessel_id, voyage)?))
        }
        OptionsRequest::VesselDestinations {
            vessel_id,
            voyage,
            transit,
        } => Ok(plain_options(api.destinations(&DestinationScope::Vessel {
            vessel_id: vessel_id.clone(),
            voyage: voyage.clone(),
            transit: transit.clone(),
        })?)),
        OptionsRequest::Ports { country_id } => Ok(api
            .ports(Some(country_id))?
            .into_iter()
            .map(|p| SelectOption::new(p.id, p.origin_name))
            .collect()),
        OptionsRequest::OriginDestinations {
            country_id,
            port_id,
        } => {
            let ports = api.ports(Some(country_id))?;
            let transit = ports
                .iter()
                .find(|p| p.id == *port_id)
                .map(|p| p.transit_name.clone())
                .ok_or_else(|| ApiError::Decode(format!("unknown port: {port_id}")))?;
            Ok(plain_options(api.destinations(&DestinationScope::Origin {
                transit,
                country_id: country_id.clone(),
            })?))
        }
    }
}

fn plain_options(values: Vec<String>) -> Vec<SelectOption> {
    values.into_iter().map(SelectOption::plain).collect()
}

fn handle_export(
    api: &dyn ScheduleApi,
    kind: ExportKind,
    csv: bool,
    out_dir: &std::path::Path,
    tx: &Sender<WorkerResponse>,
) {
    let result = (|| -> Result<Vec<PathBuf>, freightdeck_exchange::ExchangeError> {
        std::fs::create_dir_all(out_dir)?;
        match kind {
            ExportKind::Template => {
                Ok(vec![export_template(&out_dir.join("schedule_template.xlsx"))?])
            }
            ExportKind::Bulk => {
                let schedules = api.schedules(None)?;
                let mut files =
                    vec![export_bulk(&schedules, &out_dir.join("schedules_bulk.xlsx"))?];
                if csv {
                    let layout = freightdeck_exchange::bulk_layout(
                        &freightdeck_exchange::group_by_port(&schedules),
                    );
                    let path = out_dir.join("schedules_bulk.csv");
                    std::fs::write(&path, write_csv(&layout)?)?;
                    files.push(path);
                }
                Ok(files)
            }
            ExportKind::PerPort => {
                let schedules = api.schedules(None)?;
                export_per_port(&schedules, out_dir)
            }
        }
    })();

    match result {
        Ok(files) => {
            let _ = tx.send(WorkerResponse::ExportDone { files });
        }
        Err(freightdeck_exchange::ExchangeError::Api(e)) => send_error(tx, "export", e),
        Err(e) => {
            let _ = tx.send(WorkerResponse::Error {
                category: "export".into(),
                message: e.to_string(),
                context: "export".into(),
            });
        }
    }
}

/// Map an API error onto the channel. A lost session is its own response
/// so the UI can drop to the login overlay.
fn send_error(tx: &Sender<WorkerResponse>, context: &str, error: ApiError) {
    match error {
        ApiError::SessionExpired | ApiError::NotLoggedIn => {
            let _ = tx.send(WorkerResponse::SessionExpired);
        }
        other => {
            let category = match &other {
                ApiError::Network(_) => "network",
                ApiError::Api { .. } => "api",
                ApiError::Decode(_) | ApiError::Storage(_) => "other",
                ApiError::SessionExpired | ApiError::NotLoggedIn => "auth",
            };
            let _ = tx.send(WorkerResponse::Error {
                category: category.into(),
                message: other.to_string(),
                context: context.into(),
            });
        }
    }
}
