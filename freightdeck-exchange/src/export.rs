//! Layout-to-file writers: XLSX and CSV.
//!
//! XLSX dates are written as true date-typed cells with the `dd-mm-yyyy`
//! number format; the header row is bold. CSV has no date type, so dates
//! are formatted `dd-mm-yyyy` as text there.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use freightdeck_core::domain::Schedule;

use crate::group::group_by_port;
use crate::layout::{bulk_layout, port_layout, template_layout, Cell, LayoutRow};
use crate::ExchangeError;

const DATE_NUM_FORMAT: &str = "dd-mm-yyyy";
const DATE_COLUMN_WIDTH: f64 = 14.0;

/// Render a layout as XLSX bytes.
pub fn write_xlsx(rows: &[LayoutRow]) -> Result<Vec<u8>, ExchangeError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Schedules")?;

    let bold = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.cells.iter().enumerate() {
            let c = c as u16;
            match (row.kind, cell) {
                (crate::layout::RowKind::Header, Cell::Text(s)) => {
                    worksheet.write_string_with_format(r, c, s, &bold)?;
                }
                (_, Cell::Text(s)) => {
                    worksheet.write_string(r, c, s)?;
                }
                (_, Cell::Number(n)) => {
                    worksheet.write_number(r, c, *n)?;
                }
                (_, Cell::Date(d)) => {
                    worksheet.write_datetime_with_format(r, c, d, &date_format)?;
                }
                (_, Cell::Empty) => {}
            }
        }
    }

    for c in 0..rows.first().map_or(0, |r| r.cells.len()) {
        worksheet.set_column_width(c as u16, DATE_COLUMN_WIDTH)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render a layout as CSV text.
pub fn write_csv(rows: &[LayoutRow]) -> Result<String, ExchangeError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        let record: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match cell {
                Cell::Text(s) => s.clone(),
                Cell::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{}", *n as i64)
                    } else {
                        format!("{n}")
                    }
                }
                Cell::Date(d) => d.format("%d-%m-%Y").to_string(),
                Cell::Empty => String::new(),
            })
            .collect();
        wtr.write_record(&record)
            .map_err(|e| ExchangeError::Csv(e.to_string()))?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ExchangeError::Csv(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExchangeError::Csv(e.to_string()))
}

/// Export all schedules as one bulk file with group separators.
pub fn export_bulk(schedules: &[Schedule], path: &Path) -> Result<PathBuf, ExchangeError> {
    if schedules.is_empty() {
        return Err(ExchangeError::EmptyExport);
    }
    let layout = bulk_layout(&group_by_port(schedules));
    let bytes = write_xlsx(&layout)?;
    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}

/// Export one file per origin port into `dir`. Returns the written paths,
/// in group order.
pub fn export_per_port(schedules: &[Schedule], dir: &Path) -> Result<Vec<PathBuf>, ExchangeError> {
    if schedules.is_empty() {
        return Err(ExchangeError::EmptyExport);
    }
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for group in group_by_port(schedules) {
        let layout = port_layout(&group);
        let bytes = write_xlsx(&layout)?;
        let path = dir.join(format!("{}.xlsx", group.file_stem()));
        std::fs::write(&path, bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// Export the header-only template.
pub fn export_template(path: &Path) -> Result<PathBuf, ExchangeError> {
    let bytes = write_xlsx(&template_layout())?;
    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

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
    fn xlsx_output_is_a_zip_container() {
        let layout = template_layout();
        let bytes = write_xlsx(&layout).unwrap();
        // XLSX is a zip archive; the writer owns everything past the magic.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn csv_formats_dates_dd_mm_yyyy() {
        let schedules = vec![row("a", "Germany", "Hamburg")];
        let layout = bulk_layout(&group_by_port(&schedules));
        let csv = write_csv(&layout).unwrap();
        assert!(csv.contains("05-03-2026"), "ETD missing: {csv}");
        // Derived USA/Canada ETA = 2026-03-25 + 2 days.
        assert!(csv.contains("27-03-2026"), "USA/Canada ETA missing: {csv}");
        assert!(csv.contains(",22"), "USA/Canada transit missing: {csv}");
    }

    #[test]
    fn csv_separator_rows_are_blank() {
        let schedules = vec![
            row("a", "Germany", "Hamburg"),
            row("b", "Netherlands", "Rotterdam"),
        ];
        let layout = bulk_layout(&group_by_port(&schedules));
        let csv = write_csv(&layout).unwrap();
        let blank_lines = csv
            .lines()
            .filter(|l| l.chars().all(|c| c == ','))
            .count();
        assert_eq!(blank_lines, 3);
    }

    #[test]
    fn per_port_writes_one_file_per_group() {
        let dir = tempdir().unwrap();
        let schedules = vec![
            row("a", "Germany", "Hamburg"),
            row("b", "Germany", "Hamburg"),
            row("c", "Netherlands", "Rotterdam"),
        ];
        let written = export_per_port(&schedules, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("germany_hamburg.xlsx"));
        assert!(written[1].ends_with("netherlands_rotterdam.xlsx"));
        for path in &written {
            assert!(path.exists());
        }
    }

    #[test]
    fn empty_export_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            export_bulk(&[], &dir.path().join("out.xlsx")),
            Err(ExchangeError::EmptyExport)
        ));
        assert!(matches!(
            export_per_port(&[], dir.path()),
            Err(ExchangeError::EmptyExport)
        ));
    }
}
