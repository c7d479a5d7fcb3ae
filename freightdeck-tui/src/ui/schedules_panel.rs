//! Schedules panel: the cascade columns on top, result rows below.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{row_style, section_block};

pub fn draw(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(4)])
        .split(area);

    draw_cascade(frame, app, chunks[0]);
    draw_rows(frame, app, chunks[1]);
}

fn draw_cascade(frame: &mut Frame, app: &AppState, area: Rect) {
    let cascade = &app.schedules.cascade;
    let depth = cascade.depth();
    let constraints: Vec<Constraint> = (0..depth)
        .map(|_| Constraint::Ratio(1, depth as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for level in 0..depth {
        let focused = level == app.schedules.focused_level;
        let title = match cascade.selection_label(level) {
            Some(label) => format!("{}: {label}", cascade.mode().level_label(level)),
            None => cascade.mode().level_label(level).to_string(),
        };

        let options = cascade.options(level);
        let items: Vec<ListItem> = if options.is_empty() {
            let hint = if level == 0 || cascade.selection(level - 1).is_some() {
                if app.schedules.loading && focused {
                    "loading…"
                } else {
                    "(no options)"
                }
            } else {
                "(select upstream first)"
            };
            vec![ListItem::new(Span::styled(hint, theme::muted()))]
        } else {
            options
                .iter()
                .enumerate()
                .map(|(i, opt)| {
                    let selected = cascade.selection(level) == Some(opt.id.as_str());
                    let highlighted = focused && i == app.schedules.highlighted;
                    let marker = if selected { "● " } else { "  " };
                    let style = if selected {
                        theme::positive()
                    } else {
                        theme::secondary()
                    };
                    ListItem::new(Line::from(Span::styled(
                        format!("{marker}{}", opt.label),
                        row_style(highlighted, style),
                    )))
                })
                .collect()
        };

        let list = List::new(items).block(section_block(&title, focused));
        frame.render_widget(list, columns[level]);
    }
}

fn draw_rows(frame: &mut Frame, app: &AppState, area: Rect) {
    let title = format!("Results — {} path", app.schedules.cascade.mode().label());
    let block = section_block(&title, false);

    let Some(rows) = app.schedules.cascade.rows() else {
        let hint = if app.schedules.loading {
            "Loading…"
        } else {
            "Complete the filter path above to load schedules. [m] switches path."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, theme::muted())).block(block),
            area,
        );
        return;
    };

    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No schedules match this filter path.",
                theme::warning(),
            ))
            .block(block),
            area,
        );
        return;
    }

    let header = Row::new(
        ["Vessel", "Voyage", "Origin", "Transit", "ETD", "Dest", "Dest ETA", "Days"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, theme::accent_bold()))),
    );
    let body = rows.iter().enumerate().map(|(i, s)| {
        let style = row_style(i == app.schedules.row_cursor, theme::secondary());
        Row::new([
            Cell::from(s.vessel_name.clone()),
            Cell::from(s.voyage.clone()),
            Cell::from(s.origin_name.clone()),
            Cell::from(s.transit_name.clone()),
            Cell::from(s.etd.format("%d-%m-%Y").to_string()),
            Cell::from(s.destination.clone()),
            Cell::from(s.destination_eta.format("%d-%m-%Y").to_string()),
            Cell::from(s.transit_days.to_string()),
        ])
        .style(style)
    });

    let table = Table::new(
        body,
        [
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Min(12),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, area);
}
