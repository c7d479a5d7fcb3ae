//! Single-line status bar: last message on the left, session state right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn draw(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(14)])
        .split(area);

    let message = match &app.status_message {
        Some((text, level)) => {
            let style = match level {
                StatusLevel::Info => theme::secondary(),
                StatusLevel::Warning => theme::warning(),
                StatusLevel::Error => theme::negative(),
            };
            Span::styled(format!(" {text}"), style)
        }
        None => Span::styled(" [v] errors  [q] quit", theme::muted()),
    };
    frame.render_widget(Paragraph::new(message), chunks[0]);

    let session = if app.logged_in {
        Span::styled("logged in ", theme::positive())
    } else {
        Span::styled("logged out ", theme::negative())
    };
    frame.render_widget(
        Paragraph::new(session).alignment(ratatui::layout::Alignment::Right),
        chunks[1],
    );
}
