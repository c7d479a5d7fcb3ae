//! Static key reference.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;
use crate::ui::section_block;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("1-5 / Tab", "switch panel"),
            ("v", "error history"),
            ("L", "log out"),
            ("q", "quit"),
        ],
    ),
    (
        "Schedules",
        &[
            ("m", "toggle vessel / origin path"),
            ("h/l", "focus filter level"),
            ("j/k + Enter", "pick an option"),
            ("x", "clear level (and everything below)"),
            ("J/K", "move through result rows"),
            ("e", "edit row in the form"),
            ("d", "delete row"),
            ("r", "refresh rows"),
        ],
    ),
    (
        "Form",
        &[
            ("i / Enter", "edit the active field"),
            ("s", "save (create or update)"),
            ("n", "start a blank schedule"),
        ],
    ),
    (
        "Transfer",
        &[
            ("t / c / o", "export kind, CSV copy, output dir"),
            ("x", "run export"),
            ("p / b / w", "import file, mode, overwrite"),
            ("u", "run import"),
        ],
    ),
    (
        "Users",
        &[("i", "invite"), ("d", "remove"), ("r", "refresh")],
    ),
];

pub fn draw(frame: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for (section, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(*section, theme::accent_bold())));
        for (key, what) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<14}"), theme::positive()),
                Span::styled(*what, theme::secondary()),
            ]));
        }
        lines.push(Line::raw(""));
    }
    frame.render_widget(
        Paragraph::new(lines).block(section_block("Help", false)),
        area,
    );
}
