use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::components::{self, TextInputConfig};
use super::theme::Palette;
use super::utils::centered_rect;

use crate::app::App;

fn render_dialog_frame(f: &mut Frame, palette: &Palette, area: Rect, title: &str) {
    f.render_widget(Clear, area);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    title.to_string(),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .border_style(Style::default().fg(palette.accent))
            .style(Style::default().bg(palette.surface)),
        area,
    );
}

pub fn render_create_room(f: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect(45, 30, f.area());
    render_dialog_frame(f, palette, area, "Create chatroom");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title input
            Constraint::Length(1), // Error
            Constraint::Min(0),
            Constraint::Length(1), // Hint
        ])
        .split(area);

    let Some([input, error, _, hint]) = chunks.get(0..4).and_then(|s| <&[_; 4]>::try_from(s).ok())
    else {
        return;
    };

    components::render_text_input(
        f,
        *input,
        palette,
        TextInputConfig::new(app.room_title_input.content(), " Title ")
            .with_placeholder("Chatroom title")
            .with_cursor_position(app.room_title_input.cursor_position()),
    );
    if let Some(message) = &app.room_title_error {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", message),
                Style::default().fg(palette.error),
            )),
            *error,
        );
    }
    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter create · Esc cancel",
            Style::default().fg(palette.muted),
        ))
        .alignment(Alignment::Center),
        *hint,
    );
}

pub fn render_delete_room(f: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect(45, 30, f.area());
    render_dialog_frame(f, palette, area, "Delete chatroom?");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let Some([content_area, buttons_area]) =
        chunks.get(0..2).and_then(|s| <&[_; 2]>::try_from(s).ok())
    else {
        return;
    };

    let title = app
        .pending_delete
        .as_ref()
        .and_then(|id| app.rooms.iter().find(|room| &room.id == id))
        .map_or("", |room| room.title.as_str());
    let warning_lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to delete this chatroom? This cannot be undone.",
            Style::default().fg(palette.text),
        )),
    ];
    f.render_widget(
        Paragraph::new(warning_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        *content_area,
    );

    let delete_selected = app.delete_confirmed;
    let unselected = Style::default().fg(palette.text);
    let delete_style = if delete_selected { palette.selected() } else { unselected };
    let cancel_style = if delete_selected { unselected } else { palette.selected() };

    let buttons = Line::from(vec![
        Span::styled("  Cancel  ", cancel_style),
        Span::raw("    "),
        Span::styled("  Delete  ", delete_style),
    ]);
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        *buttons_area,
    );
}
