//! Schedule create/edit form with a live USA/Canada derivation preview.

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

use freightdeck_core::derive::{usca_eta, usca_transit_days};

use crate::app::{AppState, FORM_FIELDS};
use crate::theme;
use crate::ui::section_block;

pub fn draw(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(FORM_FIELDS.len() as u16 + 2), Constraint::Length(4)])
        .split(area);

    let title = match &app.form.schedule_id {
        Some(id) => format!("Edit schedule {id}"),
        None => "New schedule".to_string(),
    };

    let items: Vec<ListItem> = FORM_FIELDS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let active = i == app.form.active_field;
            let cursor = if active && app.form.insert_mode {
                "▏"
            } else {
                ""
            };
            let label_style = if active {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{name:<16} "), label_style),
                Span::styled(format!("{}{cursor}", app.form.values[i]), theme::secondary()),
            ]))
        })
        .collect();

    let list = List::new(items).block(section_block(&title, true));
    frame.render_widget(list, chunks[0]);

    draw_preview(frame, app, chunks[1]);
}

/// Derived columns are never typed in; show what the export will contain.
fn draw_preview(frame: &mut Frame, app: &AppState, area: Rect) {
    // Field 8 is the destination ETA, field 9 the transit days.
    let eta = NaiveDate::parse_from_str(app.form.values[8].trim(), "%Y-%m-%d").ok();
    let days: Option<u32> = app.form.values[9].trim().parse().ok();

    let line = match (eta, days) {
        (Some(eta), Some(days)) => Line::from(vec![
            Span::styled("USA/Canada ETA ", theme::muted()),
            Span::styled(usca_eta(eta).format("%d-%m-%Y").to_string(), theme::positive()),
            Span::styled("   USA/Canada transit days ", theme::muted()),
            Span::styled(usca_transit_days(days).to_string(), theme::positive()),
        ]),
        _ => Line::from(Span::styled(
            "Fill destination ETA and transit days to preview the USA/Canada columns",
            theme::muted(),
        )),
    };

    let hint = Line::from(Span::styled(
        "[i] edit field  [j/k] move  [s] save  [n] new  (dates YYYY-MM-DD)",
        theme::muted(),
    ));

    let para = Paragraph::new(vec![line, hint]).block(section_block("Derived", false));
    frame.render_widget(para, area);
}
