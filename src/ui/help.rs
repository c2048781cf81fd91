use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::components;
use super::theme::Palette;

use crate::app::App;

const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Ctrl+C", "Quit"),
            ("Ctrl+D", "Toggle dark mode"),
            ("Ctrl+L", "Sign out"),
            ("?", "Help (from the sidebar)"),
        ],
    ),
    (
        "Chatrooms",
        &[
            ("↑/↓", "Move through chatrooms"),
            ("Enter", "Open chatroom"),
            ("n", "New chatroom"),
            ("Del", "Delete chatroom"),
            ("/", "Search chatrooms"),
        ],
    ),
    (
        "Conversation",
        &[
            ("Enter", "Send message"),
            ("Ctrl+V", "Attach clipboard image"),
            ("PgUp/PgDn", "Scroll a page"),
            ("Ctrl+↑/↓", "Scroll a line"),
            ("Home", "Oldest loaded message"),
            ("End", "Jump to latest"),
            ("Click", "Copy the latest reply"),
            ("Esc", "Back to chatrooms"),
        ],
    ),
];

pub fn render_help_view(f: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.dark_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    if let [header, body, footer] = &chunks[..] {
        render_help_header(f, &palette, *header);
        render_help_body(f, &palette, *body);
        components::render_navigation_footer(f, *footer, &palette, "HELP", &[("Esc", "back")], &[]);
    }
}

fn render_help_header(f: &mut Frame, palette: &Palette, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled("Parlor", palette.brand_title()),
            Span::styled(" ", Style::default().fg(palette.muted)),
            Span::styled("Help", Style::default().fg(palette.accent)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .alignment(Alignment::Left),
        area,
    );
}

fn render_help_body(f: &mut Frame, palette: &Palette, area: Rect) {
    let mut lines = Vec::new();
    for (section, entries) in SHORTCUTS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", section),
            Style::default().fg(palette.accent),
        )));
        lines.push(Line::from(""));
        for (key, description) in *entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(palette.key)),
                Span::styled(*description, Style::default().fg(palette.text)),
            ]));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Shortcuts ")
                .border_style(Style::default().fg(palette.border)),
        ),
        area,
    );
}
