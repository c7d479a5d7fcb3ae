//! Domain records mirrored from the schedule API.
//!
//! These are transient copies held for the duration of a screen; the server
//! owns creation and destruction. The client enforces no invariant beyond
//! referential consistency between dropdown selections and the +2-day
//! USA/Canada derivation in [`crate::derive`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A vessel operating scheduled sailings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: String,
    pub name: String,
}

/// A country a port belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
}

/// An origin port and the transit hub its cargo routes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub country_id: String,
    /// Origin port name (e.g. "Hamburg").
    pub origin_name: String,
    /// Transit hub name (e.g. "Dubai").
    pub transit_name: String,
}

/// One sailing schedule row as the server sends it.
///
/// All dates travel as `YYYY-MM-DD` (chrono's default NaiveDate format).
/// The USA/Canada leg columns are never stored; see [`crate::derive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub vessel_id: String,
    pub vessel_name: String,
    /// Voyage number (e.g. "012E").
    pub voyage: String,
    pub port_id: String,
    pub origin_name: String,
    pub transit_name: String,
    pub country_name: String,
    /// Container freight station closing date.
    pub cfs_closing: NaiveDate,
    /// Full container load closing date.
    pub fcl_closing: NaiveDate,
    /// Estimated time of departure from origin.
    pub etd: NaiveDate,
    /// Estimated arrival at the transit hub.
    pub eta_transit: NaiveDate,
    /// Destination region (e.g. "Europe").
    pub destination: String,
    /// Estimated arrival at the destination.
    pub destination_eta: NaiveDate,
    /// Transit time in days for the Europe leg.
    pub transit_days: u32,
}

/// Fields an operator fills in when creating or editing a schedule.
///
/// Identical to [`Schedule`] minus the server-assigned id and the
/// denormalized display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub vessel_id: String,
    pub voyage: String,
    pub port_id: String,
    pub cfs_closing: NaiveDate,
    pub fcl_closing: NaiveDate,
    pub etd: NaiveDate,
    pub eta_transit: NaiveDate,
    pub destination: String,
    pub destination_eta: NaiveDate,
    pub transit_days: u32,
}

impl From<&Schedule> for ScheduleDraft {
    fn from(s: &Schedule) -> Self {
        Self {
            vessel_id: s.vessel_id.clone(),
            voyage: s.voyage.clone(),
            port_id: s.port_id.clone(),
            cfs_closing: s.cfs_closing,
            fcl_closing: s.fcl_closing,
            etd: s.etd,
            eta_transit: s.eta_transit,
            destination: s.destination.clone(),
            destination_eta: s.destination_eta,
            transit_days: s.transit_days,
        }
    }
}

/// Application account role. Fixed small set, server-enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
        }
    }

    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];
}

/// Whether an invited account has completed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Invited,
    Active,
}

impl AccountStatus {
    pub fn label(self) -> &'static str {
        match self {
            AccountStatus::Invited => "Invited",
            AccountStatus::Active => "Active",
        }
    }
}

/// A registered application account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// One entry of a dropdown option list: opaque id plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Option whose id doubles as its label (voyages, destinations).
    pub fn plain(value: impl Into<String>) -> Self {
        let v = value.into();
        Self {
            id: v.clone(),
            label: v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn schedule_dates_serialize_as_iso() {
        let s = Schedule {
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
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"etd\":\"2026-03-05\""));
        assert!(json.contains("\"destination_eta\":\"2026-03-25\""));
    }

    #[test]
    fn schedule_json_round_trip_is_identity() {
        let s = Schedule {
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
        let json = serde_json::to_string(&s).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let r: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(r, Role::Viewer);
    }

    #[test]
    fn draft_from_schedule_keeps_editable_fields() {
        let s = Schedule {
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
        let draft = ScheduleDraft::from(&s);
        assert_eq!(draft.vessel_id, "v1");
        assert_eq!(draft.voyage, "012E");
        assert_eq!(draft.destination_eta, d("2026-03-25"));
        assert_eq!(draft.transit_days, 20);
    }
}
