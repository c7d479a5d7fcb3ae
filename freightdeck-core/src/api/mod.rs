//! Schedule API trait and structured error types.
//!
//! The [`ScheduleApi`] trait abstracts over the REST backend so the TUI and
//! tests can substitute a fake. The one real implementation is
//! [`HttpApi`], a blocking reqwest client.

pub mod http;
pub mod session;

pub use http::HttpApi;
pub use session::SessionStore;

use thiserror::Error;

use crate::cascade::ScheduleQuery;
use crate::domain::{Country, Port, Schedule, ScheduleDraft, User, Vessel};
use crate::schema::{InviteRequest, UploadMode, UploadReport, UserEdit};

/// Flat error taxonomy for every API call.
///
/// Designed to be displayable in both CLI and TUI contexts. None of these
/// is fatal: the screen stays interactive and the operator may retry.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("server rejected the request (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("session expired — please log in again")]
    SessionExpired,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("session storage error: {0}")]
    Storage(String),
}

/// Which parameters select the destination option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationScope {
    /// Vessel path: vessel + voyage + transit hub.
    Vessel {
        vessel_id: String,
        voyage: String,
        transit: String,
    },
    /// Origin path: transit hub + country.
    Origin { transit: String, country_id: String },
}

/// The REST backend as the client sees it.
///
/// Every method is one shot: no automatic retry beyond the single
/// refresh-then-retry on a 403, no cancellation, no de-duplication.
pub trait ScheduleApi: Send + Sync {
    // Reference data
    fn vessels(&self) -> Result<Vec<Vessel>, ApiError>;
    fn countries(&self) -> Result<Vec<Country>, ApiError>;
    fn ports(&self, country_id: Option<&str>) -> Result<Vec<Port>, ApiError>;
    fn voyages(&self, vessel_id: &str) -> Result<Vec<String>, ApiError>;
    fn transits(&self, vessel_id: &str, voyage: &str) -> Result<Vec<String>, ApiError>;
    fn destinations(&self, scope: &DestinationScope) -> Result<Vec<String>, ApiError>;

    // Schedule CRUD
    fn schedules(&self, query: Option<&ScheduleQuery>) -> Result<Vec<Schedule>, ApiError>;
    fn schedule(&self, id: &str) -> Result<Schedule, ApiError>;
    fn create_schedule(&self, draft: &ScheduleDraft) -> Result<Schedule, ApiError>;
    fn update_schedule(&self, id: &str, draft: &ScheduleDraft) -> Result<Schedule, ApiError>;
    fn delete_schedule(&self, id: &str) -> Result<(), ApiError>;

    /// Bulk upload: the file is an opaque binary payload; all row
    /// validation happens server-side.
    fn upload_schedules(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        overwrite: bool,
        mode: UploadMode,
    ) -> Result<UploadReport, ApiError>;

    // Account management
    fn users(&self) -> Result<Vec<User>, ApiError>;
    fn invite_user(&self, invite: &InviteRequest) -> Result<User, ApiError>;
    fn update_user(&self, id: &str, edit: &UserEdit) -> Result<User, ApiError>;
    fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    // Auth
    fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;
    fn logout(&self) -> Result<(), ApiError>;
    fn is_logged_in(&self) -> bool;
}
