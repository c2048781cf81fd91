use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::components::{self, TextInputConfig};
use super::theme::Palette;

use crate::app::{App, AppMode, Focus};

pub fn render_sidebar(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    if let [search, list] = &chunks[..] {
        let searching = app.focus == Focus::Search && app.mode == AppMode::Chat;
        components::render_text_input(
            f,
            *search,
            palette,
            TextInputConfig::new(app.room_search.content(), " Search ")
                .with_placeholder("Search chatrooms...")
                .with_cursor_visible(searching)
                .with_cursor_position(app.room_search.cursor_position()),
        );
        render_room_list(f, app, palette, *list);
    }
}

fn render_room_list(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let rooms = app.filtered_rooms();
    let active = app.pane.active();
    let browsing = app.focus == Focus::Sidebar;
    let max_title_width = usize::from(area.width.saturating_sub(6));

    let items: Vec<ListItem> = if rooms.is_empty() {
        vec![
            ListItem::new(Line::from("")),
            ListItem::new(Line::from(Span::styled(
                "  No chatrooms found.",
                Style::default().fg(palette.muted),
            ))),
        ]
    } else {
        rooms
            .iter()
            .enumerate()
            .map(|(index, room)| {
                let is_highlighted = browsing && index == app.room_index;
                let is_active = active == Some(&room.id);
                let marker = if is_active { " ● " } else { "   " };
                let title: String = room.title.chars().take(max_title_width).collect();
                let title_style = if is_highlighted {
                    palette.selected()
                } else if is_active {
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.text)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(palette.accent)),
                    Span::styled(title, title_style),
                ]))
            })
            .collect()
    };

    let mut state = ListState::default();
    if !rooms.is_empty() {
        state.select(Some(app.room_index));
    }

    f.render_stateful_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" Chatrooms ({}) ", app.rooms.len()),
                    Style::default().fg(palette.text),
                ))
                .border_style(Style::default().fg(if browsing {
                    palette.accent
                } else {
                    palette.border
                })),
        ),
        area,
        &mut state,
    );
}
