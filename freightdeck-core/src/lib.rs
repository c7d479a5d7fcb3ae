//! Freightdeck Core — domain records, filter state machine, API client.
//!
//! This crate contains everything the screens share:
//! - Domain records mirrored from the schedule API (vessels, ports,
//!   schedules, countries, users)
//! - The cascading selection filter (vessel path and origin path)
//! - The USA/Canada +2-day derivation rules
//! - The wire schema (response envelope, token pair, upload report)
//! - A blocking REST client with session load/refresh/clear lifecycle
//!
//! No UI types live here; the TUI and CLI both sit on top of this crate.

pub mod api;
pub mod cascade;
pub mod derive;
pub mod domain;
pub mod schema;
