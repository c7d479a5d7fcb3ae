//! Transfer panel: Excel/CSV export settings on the left, import settings
//! and the last upload report on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use freightdeck_core::schema::UploadMode;
use freightdeck_exchange::report_lines;

use crate::app::{AppState, TransferInput};
use crate::theme;
use crate::ui::section_block;

pub fn draw(frame: &mut Frame, app: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_export(frame, app, halves[0]);
    draw_import(frame, app, halves[1]);
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn setting<'a>(label: &'a str, value: String, editing: bool) -> ListItem<'a> {
    let cursor = if editing { "▏" } else { "" };
    ListItem::new(Line::from(vec![
        Span::styled(format!("{label:<14} "), theme::muted()),
        Span::styled(format!("{value}{cursor}"), theme::secondary()),
    ]))
}

fn draw_export(frame: &mut Frame, app: &AppState, area: Rect) {
    let t = &app.transfer;
    let mut items = vec![
        setting("[t] Kind", t.export_kind.label().to_string(), false),
        setting("[c] CSV copy", yes_no(t.csv), false),
        setting(
            "[o] Out dir",
            t.out_dir.clone(),
            t.editing == Some(TransferInput::OutDir),
        ),
    ];
    items.push(ListItem::new(Line::raw("")));
    items.push(ListItem::new(Span::styled(
        if t.in_flight {
            "[x] Export — working…"
        } else {
            "[x] Export"
        },
        theme::accent_bold(),
    )));

    if !t.last_files.is_empty() {
        items.push(ListItem::new(Line::raw("")));
        items.push(ListItem::new(Span::styled("Last export:", theme::muted())));
        for file in &t.last_files {
            items.push(ListItem::new(Span::styled(
                format!("  {}", file.display()),
                theme::positive(),
            )));
        }
    }

    let list = List::new(items).block(section_block("Export", true));
    frame.render_widget(list, area);
}

fn draw_import(frame: &mut Frame, app: &AppState, area: Rect) {
    let t = &app.transfer;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let mode = match t.upload_mode {
        UploadMode::Bulk => "bulk (grouped sheet)",
        UploadMode::Origin => "origin (single port)",
    };
    let items = vec![
        setting(
            "[p] File",
            t.import_path.clone(),
            t.editing == Some(TransferInput::ImportPath),
        ),
        setting("[b] Mode", mode.to_string(), false),
        setting("[w] Overwrite", yes_no(t.overwrite), false),
        ListItem::new(Line::raw("")),
        ListItem::new(Span::styled(
            if t.in_flight {
                "[u] Import — working…"
            } else {
                "[u] Import"
            },
            theme::accent_bold(),
        )),
    ];
    frame.render_widget(List::new(items).block(section_block("Import", false)), chunks[0]);

    let report = match &t.last_report {
        Some(report) => {
            let lines: Vec<Line> = report_lines(report)
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    let style = if i == 0 {
                        if report.failed == 0 {
                            theme::positive()
                        } else {
                            theme::warning()
                        }
                    } else {
                        theme::negative()
                    };
                    Line::from(Span::styled(text, style))
                })
                .collect();
            Paragraph::new(lines).wrap(Wrap { trim: false })
        }
        None => Paragraph::new(Span::styled("No upload yet.", theme::muted())),
    };
    frame.render_widget(report.block(section_block("Last report", false)), chunks[1]);
}
