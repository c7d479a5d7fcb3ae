//! Tabular layout for schedule exports.
//!
//! The layout is computed independently of the spreadsheet writer so the
//! grouping, separators, and derived columns are testable without parsing
//! XLSX bytes. A layout is a flat list of rows; the writers in
//! [`crate::export`] translate it cell by cell.

use chrono::NaiveDate;

use freightdeck_core::derive::{usca_eta, usca_transit_days};
use freightdeck_core::domain::Schedule;

use crate::group::PortGroup;

/// Column headers, in emission order. The last two are the derived
/// USA/Canada leg columns.
pub const COLUMNS: [&str; 13] = [
    "Vessel",
    "Voyage",
    "Origin",
    "Transit Hub",
    "CFS Closing",
    "FCL Closing",
    "ETD",
    "ETA Transit",
    "Destination",
    "Destination ETA",
    "Transit Days",
    "USA/Canada ETA",
    "USA/Canada Transit Days",
];

/// Rows of a visual separator between port groups in the bulk file.
pub const SEPARATOR_ROWS: usize = 3;

/// One cell of the layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Emitted as a true date-typed cell (`dd-mm-yyyy`), never text.
    Date(NaiveDate),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
    Separator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl LayoutRow {
    fn header() -> Self {
        Self {
            kind: RowKind::Header,
            cells: COLUMNS.iter().map(|c| Cell::Text(c.to_string())).collect(),
        }
    }

    fn separator() -> Self {
        Self {
            kind: RowKind::Separator,
            cells: vec![Cell::Empty; COLUMNS.len()],
        }
    }

    fn data(s: &Schedule) -> Self {
        Self {
            kind: RowKind::Data,
            cells: vec![
                Cell::Text(s.vessel_name.clone()),
                Cell::Text(s.voyage.clone()),
                Cell::Text(s.origin_name.clone()),
                Cell::Text(s.transit_name.clone()),
                Cell::Date(s.cfs_closing),
                Cell::Date(s.fcl_closing),
                Cell::Date(s.etd),
                Cell::Date(s.eta_transit),
                Cell::Text(s.destination.clone()),
                Cell::Date(s.destination_eta),
                Cell::Number(f64::from(s.transit_days)),
                Cell::Date(usca_eta(s.destination_eta)),
                Cell::Number(f64::from(usca_transit_days(s.transit_days))),
            ],
        }
    }
}

/// Bulk layout: one header, all groups, 3 separator rows between groups.
pub fn bulk_layout(groups: &[PortGroup]) -> Vec<LayoutRow> {
    let mut rows = vec![LayoutRow::header()];
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            for _ in 0..SEPARATOR_ROWS {
                rows.push(LayoutRow::separator());
            }
        }
        rows.extend(group.rows.iter().map(LayoutRow::data));
    }
    rows
}

/// Single-port layout: one header plus that port's rows, no separators.
pub fn port_layout(group: &PortGroup) -> Vec<LayoutRow> {
    let mut rows = vec![LayoutRow::header()];
    rows.extend(group.rows.iter().map(LayoutRow::data));
    rows
}

/// Template layout: the bold header row only, no data.
pub fn template_layout() -> Vec<LayoutRow> {
    vec![LayoutRow::header()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_by_port;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(id: &str, country: &str, origin: &str) -> Schedule {
        Schedule {
            id: id.into(),
            vessel_id: "v1".into(),
            vessel_name: "MAERSK ONE".into(),
            voyage: "012E".into(),
            port_id: "p1".into(),
            origin_name: origin.into(),
            transit_name: "Dubai".into(),
            country_name: country.into(),
            cfs_closing: d("2026-03-01"),
            fcl_closing: d("2026-03-02"),
            etd: d("2026-03-05"),
            eta_transit: d("2026-03-15"),
            destination: "Europe".into(),
            destination_eta: d("2026-03-25"),
            transit_days: 20,
        }
    }

    #[test]
    fn bulk_layout_has_three_separator_rows_between_groups() {
        let schedules = vec![
            row("a", "Germany", "Hamburg"),
            row("b", "Netherlands", "Rotterdam"),
        ];
        let layout = bulk_layout(&group_by_port(&schedules));
        let kinds: Vec<RowKind> = layout.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Header,
                RowKind::Data,
                RowKind::Separator,
                RowKind::Separator,
                RowKind::Separator,
                RowKind::Data,
            ]
        );
    }

    #[test]
    fn no_trailing_separator_after_last_group() {
        let schedules = vec![row("a", "Germany", "Hamburg")];
        let layout = bulk_layout(&group_by_port(&schedules));
        assert_eq!(layout.last().unwrap().kind, RowKind::Data);
    }

    #[test]
    fn data_row_carries_derived_usca_columns() {
        let layout = port_layout(&group_by_port(&[row("a", "Germany", "Hamburg")])[0]);
        let data = &layout[1];
        assert_eq!(data.cells.len(), COLUMNS.len());
        // Destination ETA 2026-03-25 → USA/Canada ETA 2026-03-27.
        assert_eq!(data.cells[11], Cell::Date(d("2026-03-27")));
        // Transit 20 days → 22.
        assert_eq!(data.cells[12], Cell::Number(22.0));
    }

    #[test]
    fn dates_are_date_cells_not_text() {
        let layout = port_layout(&group_by_port(&[row("a", "Germany", "Hamburg")])[0]);
        let data = &layout[1];
        for idx in [4, 5, 6, 7, 9, 11] {
            assert!(
                matches!(data.cells[idx], Cell::Date(_)),
                "column {} should be a date cell",
                COLUMNS[idx]
            );
        }
    }

    #[test]
    fn template_is_header_only() {
        let layout = template_layout();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].kind, RowKind::Header);
        assert_eq!(layout[0].cells[0], Cell::Text("Vessel".into()));
    }
}
