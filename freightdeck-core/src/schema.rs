//! Wire schema shared with the schedule API.
//!
//! Every response arrives in the `{ data, message?, error? }` envelope.
//! The upload report is rendered as-is; the client never inspects the
//! spreadsheet rows itself.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// The standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bearer tokens returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Invitation payload for a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Editable account fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEdit {
    pub name: String,
    pub role: Role,
}

/// Whether an uploaded file contains one bulk sheet or one sheet per
/// origin port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    Bulk,
    Origin,
}

impl UploadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadMode::Bulk => "bulk",
            UploadMode::Origin => "origin",
        }
    }
}

/// Server verdict on a bulk upload. All validation is server-side; the
/// counts and per-row errors are displayed verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReport {
    pub total: u32,
    pub created: u32,
    pub updated: u32,
    pub failed: u32,
    #[serde(default)]
    pub errors: Vec<RowFailure>,
}

/// One rejected upload row: the row data echoed back plus the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: serde_json::Value,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_data_only() {
        let e: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"data":["a","b"]}"#).unwrap();
        assert_eq!(e.data.unwrap(), vec!["a", "b"]);
        assert_eq!(e.message, None);
        assert_eq!(e.error, None);
    }

    #[test]
    fn envelope_decodes_error_without_data() {
        let e: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"data":null,"error":"voyage not found"}"#).unwrap();
        assert!(e.data.is_none());
        assert_eq!(e.error.as_deref(), Some("voyage not found"));
    }

    #[test]
    fn upload_report_decodes_with_row_errors() {
        let json = r#"{
            "total": 10, "created": 7, "updated": 2, "failed": 1,
            "errors": [{"row": {"voyage": "012E", "etd": "bad"}, "error": "invalid ETD"}]
        }"#;
        let r: UploadReport = serde_json::from_str(json).unwrap();
        assert_eq!(r.total, 10);
        assert_eq!(r.created, 7);
        assert_eq!(r.updated, 2);
        assert_eq!(r.failed, 1);
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].error, "invalid ETD");
        assert_eq!(r.errors[0].row["voyage"], "012E");
    }

    #[test]
    fn upload_report_errors_default_to_empty() {
        let r: UploadReport =
            serde_json::from_str(r#"{"total":3,"created":3,"updated":0,"failed":0}"#).unwrap();
        assert!(r.errors.is_empty());
    }
}
