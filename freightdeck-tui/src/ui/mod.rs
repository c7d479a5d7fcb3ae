//! Rendering. Pure functions from `AppState` to frames.

mod form_panel;
mod help_panel;
mod overlays;
mod schedules_panel;
mod status_bar;
mod transfer_panel;
mod users_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw a full frame.
pub fn draw(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tab bar
            Constraint::Min(5),    // active panel
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);

    match app.active_panel {
        Panel::Schedules => schedules_panel::draw(frame, app, chunks[1]),
        Panel::Form => form_panel::draw(frame, app, chunks[1]),
        Panel::Transfer => transfer_panel::draw(frame, app, chunks[1]),
        Panel::Users => users_panel::draw(frame, app, chunks[1]),
        Panel::Help => help_panel::draw(frame, chunks[1]),
    }

    status_bar::draw(frame, app, chunks[2]);

    match app.overlay {
        Overlay::Login => overlays::draw_login(frame, app),
        Overlay::ErrorHistory => overlays::draw_error_history(frame, app),
        Overlay::None => {}
    }
}

fn draw_tabs(frame: &mut Frame, app: &AppState, area: Rect) {
    let titles: Vec<Line> = [
        Panel::Schedules,
        Panel::Form,
        Panel::Transfer,
        Panel::Users,
        Panel::Help,
    ]
    .into_iter()
    .map(|p| {
        Line::from(vec![
            Span::styled(format!("[{}]", p.index() + 1), theme::muted()),
            Span::raw(format!(" {}", p.label())),
        ])
    })
    .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_panel.index())
        .highlight_style(theme::accent_bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::accent())
                .title(Span::styled(" freightdeck ", theme::accent_bold())),
        );
    frame.render_widget(tabs, area);
}

/// Standard bordered block for a panel section.
pub(crate) fn section_block(title: &str, active: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(Span::styled(format!(" {title} "), theme::panel_title(active)))
}

/// A centered rect taking `percent_x` x `percent_y` of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Style a list row, reversing the highlighted one.
pub(crate) fn row_style(selected: bool, base: Style) -> Style {
    if selected {
        theme::cursor_line(true)
    } else {
        base
    }
}
