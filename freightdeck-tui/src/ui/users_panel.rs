//! Users panel: account list plus the inline invite inputs.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, List, ListItem, Row, Table};
use ratatui::Frame;

use freightdeck_core::domain::{AccountStatus, Role};

use crate::app::AppState;
use crate::theme;
use crate::ui::{row_style, section_block};

pub fn draw(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(6)])
        .split(area);

    draw_list(frame, app, chunks[0]);
    draw_invite(frame, app, chunks[1]);
}

fn draw_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let title = if app.users.loading {
        "Accounts — loading…"
    } else {
        "Accounts"
    };
    let block = section_block(title, !app.users.inviting);

    let header = Row::new(
        ["Name", "Email", "Role", "Status"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, theme::accent_bold()))),
    );
    let body = app.users.users.iter().enumerate().map(|(i, u)| {
        let status_style = match u.status {
            AccountStatus::Active => theme::positive(),
            AccountStatus::Invited => theme::warning(),
        };
        Row::new([
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.role.label()),
            Cell::from(Span::styled(
                match u.status {
                    AccountStatus::Active => "active",
                    AccountStatus::Invited => "invited",
                },
                status_style,
            )),
        ])
        .style(row_style(i == app.users.cursor, theme::secondary()))
    });

    let table = Table::new(
        body,
        [
            Constraint::Min(16),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, area);
}

fn draw_invite(frame: &mut Frame, app: &AppState, area: Rect) {
    let u = &app.users;
    let items: Vec<ListItem> = if u.inviting {
        let field = |label: &str, value: &str, active: bool| {
            let cursor = if active { "▏" } else { "" };
            let style = if active {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{label:<8} "), style),
                Span::styled(format!("{value}{cursor}"), theme::secondary()),
            ]))
        };
        vec![
            field("Name", &u.invite_name, u.invite_field == 0),
            field("Email", &u.invite_email, u.invite_field == 1),
            field("Role", Role::ALL[u.invite_role].label(), false),
            ListItem::new(Span::styled(
                "[Tab] field  [↑/↓] role  [Enter] send  [Esc] cancel",
                theme::muted(),
            )),
        ]
    } else {
        vec![ListItem::new(Span::styled(
            "[i] invite  [d] remove selected  [r] refresh  [j/k] move",
            theme::muted(),
        ))]
    };

    let list = List::new(items).block(section_block("Invite", app.users.inviting));
    frame.render_widget(list, area);
}
