//! Modal overlays: login form and the error history.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{centered_rect, section_block};

pub fn draw_login(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let field = |label: &str, value: String, active: bool| {
        let cursor = if active { "▏" } else { "" };
        let style = if active {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        Line::from(vec![
            Span::styled(format!("{label:<10} "), style),
            Span::styled(format!("{value}{cursor}"), theme::secondary()),
        ])
    };

    let masked = "•".repeat(app.login.password.chars().count());
    let mut lines = vec![
        field("Email", app.login.email.clone(), app.login.field == 0),
        field("Password", masked, app.login.field == 1),
        Line::raw(""),
    ];
    lines.push(Line::from(Span::styled(
        if app.login.in_flight {
            "Signing in…"
        } else {
            "[Tab] field  [Enter] sign in"
        },
        theme::muted(),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(section_block("Sign in", true)),
        area,
    );
}

pub fn draw_error_history(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = if app.error_history.is_empty() {
        vec![ListItem::new(Span::styled("No errors recorded.", theme::muted()))]
    } else {
        app.error_history
            .iter()
            .enumerate()
            .skip(app.error_scroll)
            .map(|(i, rec)| {
                let style = if i == app.error_scroll {
                    theme::cursor_line(true)
                } else {
                    theme::secondary()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        rec.timestamp.format("%H:%M:%S ").to_string(),
                        theme::muted(),
                    ),
                    Span::styled(format!("[{:<4}] ", rec.category.label()), theme::warning()),
                    Span::styled(format!("{} — {}", rec.message, rec.context), style),
                ]))
            })
            .collect()
    };

    let title = format!("Errors ({}) — [Esc] close", app.error_history.len());
    frame.render_widget(List::new(items).block(section_block(&title, true)), area);
}
