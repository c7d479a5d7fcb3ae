//! Freightdeck Exchange — spreadsheet export/import orchestration.
//!
//! Turns schedule lists into downloadable tabular files and feeds uploaded
//! files back to the server:
//! - Grouping by country, then origin port (stable)
//! - Tabular layout with 3-row group separators and derived USA/Canada
//!   columns
//! - XLSX writing via rust_xlsxwriter (dates as true date cells,
//!   `dd-mm-yyyy`), CSV variant for external tooling
//! - Header-only bold template
//! - Bulk upload: opaque file + overwrite/mode flags, server report
//!   rendered as-is
//!
//! The spreadsheet binary format belongs entirely to the writing library;
//! this crate only decides what goes in which row.

pub mod config;
pub mod export;
pub mod group;
pub mod layout;
pub mod upload;

pub use config::Config;
pub use export::{export_bulk, export_per_port, export_template, write_csv, write_xlsx};
pub use group::{group_by_port, PortGroup};
pub use layout::{bulk_layout, port_layout, template_layout, Cell, LayoutRow, RowKind, COLUMNS};
pub use upload::{report_lines, upload_file};

use thiserror::Error;

use freightdeck_core::api::ApiError;

/// Errors from export/import orchestration.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("csv write failed: {0}")]
    Csv(String),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("nothing to export")]
    EmptyExport,
}
