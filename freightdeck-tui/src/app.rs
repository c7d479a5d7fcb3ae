//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via `mpsc`
//! channels; every network call is dispatched as a [`WorkerCommand`] and
//! lands back as a [`WorkerResponse`].

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use freightdeck_core::cascade::{CascadeFilter, FilterMode, SelectOutcome};
use freightdeck_core::domain::{Schedule, ScheduleDraft, User};
use freightdeck_core::schema::{UploadMode, UploadReport};

use crate::worker::{OptionsRequest, WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Schedules,
    Form,
    Transfer,
    Users,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Schedules => 0,
            Panel::Form => 1,
            Panel::Transfer => 2,
            Panel::Users => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Schedules),
            1 => Some(Panel::Form),
            2 => Some(Panel::Transfer),
            3 => Some(Panel::Users),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Schedules => "Schedules",
            Panel::Form => "Form",
            Panel::Transfer => "Transfer",
            Panel::Users => "Users",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 5).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 4) % 5).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Auth,
    Validation,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Api => "API",
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::Validation => "VAL",
            ErrorCategory::Export => "EXP",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "network" => ErrorCategory::Network,
            "api" => ErrorCategory::Api,
            "auth" => ErrorCategory::Auth,
            "validation" => ErrorCategory::Validation,
            "export" => ErrorCategory::Export,
            _ => ErrorCategory::Other,
        }
    }
}

/// Modal overlays, drawn above the active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Login,
    ErrorHistory,
}

/// Schedules panel state: the cascade plus cursors.
#[derive(Debug)]
pub struct SchedulesState {
    pub cascade: CascadeFilter,
    /// Which cascade level the keyboard focuses.
    pub focused_level: usize,
    /// Highlighted option index at the focused level.
    pub highlighted: usize,
    /// Cursor into the result rows.
    pub row_cursor: usize,
    pub loading: bool,
}

impl SchedulesState {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            cascade: CascadeFilter::new(mode),
            focused_level: 0,
            highlighted: 0,
            row_cursor: 0,
            loading: false,
        }
    }
}

/// Editable form fields, in display order. Dates are typed as
/// `YYYY-MM-DD` text and parsed on submit.
pub const FORM_FIELDS: [&str; 10] = [
    "Vessel id",
    "Voyage",
    "Port id",
    "CFS closing",
    "FCL closing",
    "ETD",
    "ETA transit",
    "Destination",
    "Destination ETA",
    "Transit days",
];

/// Schedule create/edit form.
#[derive(Debug)]
pub struct FormState {
    pub values: Vec<String>,
    pub active_field: usize,
    pub insert_mode: bool,
    /// `Some(id)` when editing an existing schedule.
    pub schedule_id: Option<String>,
    pub saving: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            values: vec![String::new(); FORM_FIELDS.len()],
            active_field: 0,
            insert_mode: false,
            schedule_id: None,
            saving: false,
        }
    }

    /// Load an existing schedule for editing. Dates render as
    /// `YYYY-MM-DD`, the same shape they travel on the wire, so an
    /// untouched submit round-trips exactly.
    pub fn load(&mut self, s: &Schedule) {
        self.schedule_id = Some(s.id.clone());
        self.values = vec![
            s.vessel_id.clone(),
            s.voyage.clone(),
            s.port_id.clone(),
            s.cfs_closing.to_string(),
            s.fcl_closing.to_string(),
            s.etd.to_string(),
            s.eta_transit.to_string(),
            s.destination.clone(),
            s.destination_eta.to_string(),
            s.transit_days.to_string(),
        ];
        self.active_field = 0;
        self.insert_mode = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Parse the form into a draft. Returns the first field error instead
    /// of a draft when something is malformed.
    pub fn to_draft(&self) -> Result<ScheduleDraft, String> {
        let date = |idx: usize| -> Result<NaiveDate, String> {
            NaiveDate::parse_from_str(self.values[idx].trim(), "%Y-%m-%d")
                .map_err(|_| format!("{}: expected YYYY-MM-DD", FORM_FIELDS[idx]))
        };
        let text = |idx: usize| -> Result<String, String> {
            let v = self.values[idx].trim();
            if v.is_empty() {
                Err(format!("{}: required", FORM_FIELDS[idx]))
            } else {
                Ok(v.to_string())
            }
        };
        Ok(ScheduleDraft {
            vessel_id: text(0)?,
            voyage: text(1)?,
            port_id: text(2)?,
            cfs_closing: date(3)?,
            fcl_closing: date(4)?,
            etd: date(5)?,
            eta_transit: date(6)?,
            destination: text(7)?,
            destination_eta: date(8)?,
            transit_days: self.values[9]
                .trim()
                .parse()
                .map_err(|_| "Transit days: expected a number".to_string())?,
        })
    }
}

/// Bulk export flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    Bulk,
    PerPort,
    Template,
}

impl ExportKind {
    pub fn label(self) -> &'static str {
        match self {
            ExportKind::Bulk => "Bulk (one file, grouped)",
            ExportKind::PerPort => "Per port (one file each)",
            ExportKind::Template => "Template (header only)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ExportKind::Bulk => ExportKind::PerPort,
            ExportKind::PerPort => ExportKind::Template,
            ExportKind::Template => ExportKind::Bulk,
        }
    }
}

/// Which transfer text input is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferInput {
    OutDir,
    ImportPath,
}

/// Transfer panel state: export settings, import settings, last report.
#[derive(Debug)]
pub struct TransferState {
    pub export_kind: ExportKind,
    pub csv: bool,
    pub out_dir: String,
    pub import_path: String,
    pub overwrite: bool,
    pub upload_mode: UploadMode,
    pub editing: Option<TransferInput>,
    pub in_flight: bool,
    pub last_files: Vec<PathBuf>,
    pub last_report: Option<UploadReport>,
}

impl TransferState {
    pub fn new(out_dir: String) -> Self {
        Self {
            export_kind: ExportKind::Bulk,
            csv: false,
            out_dir,
            import_path: String::new(),
            overwrite: false,
            upload_mode: UploadMode::Bulk,
            editing: None,
            in_flight: false,
            last_files: Vec::new(),
            last_report: None,
        }
    }
}

/// Users panel state, including the inline invite inputs.
#[derive(Debug)]
pub struct UsersState {
    pub users: Vec<User>,
    pub cursor: usize,
    pub loading: bool,
    pub inviting: bool,
    pub invite_name: String,
    pub invite_email: String,
    pub invite_role: usize,
    /// 0 = name, 1 = email.
    pub invite_field: usize,
}

impl UsersState {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            cursor: 0,
            loading: false,
            inviting: false,
            invite_name: String::new(),
            invite_email: String::new(),
            invite_role: 0,
            invite_field: 0,
        }
    }
}

/// Login overlay state.
#[derive(Debug, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    /// 0 = email, 1 = password.
    pub field: usize,
    pub in_flight: bool,
}

const ERROR_HISTORY_CAP: usize = 50;

/// All TUI state. Owned by the main thread.
pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub overlay: Overlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub logged_in: bool,

    pub schedules: SchedulesState,
    pub form: FormState,
    pub transfer: TransferState,
    pub users: UsersState,
    pub login: LoginState,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        state_path: PathBuf,
        out_dir: String,
        logged_in: bool,
    ) -> Self {
        Self {
            running: true,
            active_panel: Panel::Schedules,
            overlay: if logged_in {
                Overlay::None
            } else {
                Overlay::Login
            },
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            logged_in,
            schedules: SchedulesState::new(FilterMode::Vessel),
            form: FormState::new(),
            transfer: TransferState::new(out_dir),
            users: UsersState::new(),
            login: LoginState::default(),
            worker_tx,
            worker_rx,
            state_path,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some((message.into(), level));
    }

    pub fn push_error(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        let message = message.into();
        self.set_status(message.clone(), StatusLevel::Error);
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context: context.into(),
        });
        self.error_history.truncate(ERROR_HISTORY_CAP);
    }

    /// Lost session: clear everything credential-dependent and show the
    /// login overlay.
    pub fn on_session_expired(&mut self) {
        self.logged_in = false;
        self.overlay = Overlay::Login;
        self.login.in_flight = false;
        self.set_status("Session expired — please log in again", StatusLevel::Warning);
    }

    /// Kick off the level-0 options fetch for the current filter mode.
    pub fn load_cascade_root(&mut self) {
        let generation = self.schedules.cascade.generation();
        self.request_options(0, generation);
    }

    /// Toggle between the vessel path and the origin path. Everything
    /// resets; the new root options are fetched immediately.
    pub fn toggle_filter_mode(&mut self) {
        let next = match self.schedules.cascade.mode() {
            FilterMode::Vessel => FilterMode::Origin,
            FilterMode::Origin => FilterMode::Vessel,
        };
        let generation = self.schedules.cascade.set_mode(next);
        self.schedules.focused_level = 0;
        self.schedules.highlighted = 0;
        self.schedules.row_cursor = 0;
        self.request_options(0, generation);
    }

    /// Select the highlighted option at the focused level and dispatch
    /// whatever fetch the cascade asks for next.
    pub fn select_highlighted(&mut self) {
        let level = self.schedules.focused_level;
        let id = match self.schedules.cascade.options(level).get(self.schedules.highlighted) {
            Some(o) => o.id.clone(),
            None => return,
        };
        match self.schedules.cascade.select(level, &id) {
            SelectOutcome::Ignored => {}
            SelectOutcome::FetchNext { level: next, generation } => {
                self.schedules.focused_level = next;
                self.schedules.highlighted = 0;
                self.schedules.row_cursor = 0;
                self.request_options(next, generation);
            }
            SelectOutcome::Complete { generation } => {
                self.schedules.row_cursor = 0;
                self.request_rows(generation);
            }
        }
    }

    /// Clear the focused level; everything deeper empties with it.
    pub fn clear_focused_level(&mut self) {
        let level = self.schedules.focused_level;
        self.schedules.cascade.clear(level);
        self.schedules.highlighted = 0;
        self.schedules.row_cursor = 0;
    }

    /// Re-fetch the result rows for a complete path.
    pub fn refresh_rows(&mut self) {
        if self.schedules.cascade.is_complete() {
            let generation = self.schedules.cascade.generation();
            self.request_rows(generation);
        } else {
            self.set_status("Select every filter level first", StatusLevel::Warning);
        }
    }

    fn request_options(&mut self, level: usize, generation: u64) {
        let Some(request) = options_request(&self.schedules.cascade, level) else {
            return;
        };
        self.schedules.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::FetchOptions {
            level,
            generation,
            request,
        });
    }

    fn request_rows(&mut self, generation: u64) {
        let Some(query) = self.schedules.cascade.query() else {
            return;
        };
        self.schedules.loading = true;
        let _ = self
            .worker_tx
            .send(WorkerCommand::FetchRows { generation, query });
    }
}

/// Translate "fetch options for level N" into the concrete API request,
/// using the upstream selections. `None` when an upstream selection is
/// missing (the fetch would be meaningless).
pub fn options_request(cascade: &CascadeFilter, level: usize) -> Option<OptionsRequest> {
    let sel = |i: usize| cascade.selection(i).map(str::to_string);
    match (cascade.mode(), level) {
        (FilterMode::Vessel, 0) => Some(OptionsRequest::Vessels),
        (FilterMode::Vessel, 1) => Some(OptionsRequest::Voyages { vessel_id: sel(0)? }),
        (FilterMode::Vessel, 2) => Some(OptionsRequest::Transits {
            vessel_id: sel(0)?,
            voyage: sel(1)?,
        }),
        (FilterMode::Vessel, 3) => Some(OptionsRequest::VesselDestinations {
            vessel_id: sel(0)?,
            voyage: sel(1)?,
            transit: sel(2)?,
        }),
        (FilterMode::Origin, 0) => Some(OptionsRequest::Countries),
        (FilterMode::Origin, 1) => Some(OptionsRequest::Ports { country_id: sel(0)? }),
        (FilterMode::Origin, 2) => Some(OptionsRequest::OriginDestinations {
            country_id: sel(0)?,
            port_id: sel(1)?,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightdeck_core::domain::SelectOption;
    use std::sync::mpsc;

    fn app() -> AppState {
        // The far channel ends are dropped; dispatched commands go nowhere,
        // which is fine for state-only tests.
        let (tx, _rx) = mpsc::channel();
        let (_tx, rx) = mpsc::channel::<WorkerResponse>();
        AppState::new(tx, rx, PathBuf::from("state.json"), "exports".into(), true)
    }

    #[test]
    fn panel_cycle_wraps() {
        assert_eq!(Panel::Help.next(), Panel::Schedules);
        assert_eq!(Panel::Schedules.prev(), Panel::Help);
    }

    #[test]
    fn options_request_needs_upstream_selections() {
        let cascade = CascadeFilter::new(FilterMode::Vessel);
        assert!(options_request(&cascade, 0).is_some());
        // No vessel selected yet: voyage fetch is meaningless.
        assert!(options_request(&cascade, 1).is_none());
    }

    #[test]
    fn mode_toggle_resets_cursors() {
        let mut app = app();
        app.schedules.focused_level = 2;
        app.schedules.highlighted = 5;
        app.toggle_filter_mode();
        assert_eq!(app.schedules.cascade.mode(), FilterMode::Origin);
        assert_eq!(app.schedules.focused_level, 0);
        assert_eq!(app.schedules.highlighted, 0);
    }

    #[test]
    fn select_highlighted_advances_focus() {
        let mut app = app();
        let generation = app.schedules.cascade.generation();
        app.schedules.cascade.set_options(
            0,
            generation,
            vec![SelectOption::new("v1", "MAERSK ONE")],
        );
        app.select_highlighted();
        assert_eq!(app.schedules.cascade.selection(0), Some("v1"));
        assert_eq!(app.schedules.focused_level, 1);
    }

    #[test]
    fn error_history_is_capped() {
        let mut app = app();
        for i in 0..80 {
            app.push_error(ErrorCategory::Network, format!("e{i}"), "ctx");
        }
        assert_eq!(app.error_history.len(), ERROR_HISTORY_CAP);
        // Newest first.
        assert_eq!(app.error_history[0].message, "e79");
    }

    #[test]
    fn form_round_trips_an_unchanged_schedule() {
        use chrono::NaiveDate;
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let schedule = Schedule {
            id: "s1".into(),
            vessel_id: "v1".into(),
            vessel_name: "MAERSK ONE".into(),
            voyage: "012E".into(),
            port_id: "p1".into(),
            origin_name: "Hamburg".into(),
            transit_name: "Dubai".into(),
            country_name: "Germany".into(),
            cfs_closing: d("2026-03-01"),
            fcl_closing: d("2026-03-02"),
            etd: d("2026-03-05"),
            eta_transit: d("2026-03-15"),
            destination: "Europe".into(),
            destination_eta: d("2026-03-25"),
            transit_days: 20,
        };
        let mut form = FormState::new();
        form.load(&schedule);
        let draft = form.to_draft().expect("unchanged form must parse");
        assert_eq!(draft, ScheduleDraft::from(&schedule));
    }

    #[test]
    fn form_rejects_malformed_date() {
        let mut form = FormState::new();
        form.values = vec![
            "v1".into(),
            "012E".into(),
            "p1".into(),
            "01-03-2026".into(), // wrong order
            "2026-03-02".into(),
            "2026-03-05".into(),
            "2026-03-15".into(),
            "Europe".into(),
            "2026-03-25".into(),
            "20".into(),
        ];
        let err = form.to_draft().unwrap_err();
        assert!(err.contains("CFS closing"));
    }
}
