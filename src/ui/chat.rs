use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use chrono::Local;
use std::time::Instant;

use super::components::{self, TextInputConfig};
use super::rooms;
use super::theme::Palette;
use super::utils;

use crate::app::{App, AppMode, Focus};
use crate::pane::anchor::AnchorSurface;
use crate::pane::layout::{BODY_INDENT, MessageBlock, TranscriptLayout};
use crate::pane::types::Sender;

const SIDEBAR_WIDTH: u16 = 30;

/// Screen regions of the chat view; main.rs sizes the pane from these too
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAreas {
    pub sidebar: Rect,
    pub header: Rect,
    pub transcript: Rect,
    pub composer: Rect,
    pub footer: Rect,
}

impl ChatAreas {
    pub fn new(area: Rect) -> Self {
        let sidebar_width = if area.width >= SIDEBAR_WIDTH * 2 { SIDEBAR_WIDTH } else { 0 };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);
        let sidebar = columns.first().copied().unwrap_or_default();
        let main = columns.get(1).copied().unwrap_or(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Transcript
                Constraint::Length(3), // Composer
                Constraint::Length(3), // Footer
            ])
            .split(main);

        Self {
            sidebar,
            header: rows.first().copied().unwrap_or_default(),
            transcript: rows.get(1).copied().unwrap_or_default(),
            composer: rows.get(2).copied().unwrap_or_default(),
            footer: rows.get(3).copied().unwrap_or_default(),
        }
    }

    /// Rows and columns available to message text
    #[must_use]
    pub fn transcript_inner(&self) -> Rect {
        utils::inner(self.transcript)
    }
}

/// Sidebar, header, transcript, composer, and footer
pub fn render_chat_view(f: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.dark_mode);
    let areas = ChatAreas::new(f.area());
    let now = Instant::now();

    if areas.sidebar.width > 0 {
        rooms::render_sidebar(f, app, &palette, areas.sidebar);
    }
    render_chat_header(f, app, &palette, areas.header);
    render_transcript(f, app, &palette, areas.transcript, now);
    render_composer(f, app, &palette, areas.composer);
    render_chat_footer(f, app, &palette, areas.footer);

    if let Some(message) = app.status_toast_message() {
        components::render_status_toast(f, components::toast_area(areas.header), &palette, message);
    }
}

fn render_chat_header(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let room_title = app
        .active_room()
        .map_or("No chatroom selected", |room| room.title.as_str());
    let version_text = format!("v{}", env!("CARGO_PKG_VERSION"));

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled("Parlor", palette.brand_title()),
            Span::styled(" ", Style::default().fg(palette.muted)),
            Span::styled(room_title, Style::default().fg(palette.accent)),
            Span::styled(" ", Style::default().fg(palette.muted)),
            Span::styled(version_text, Style::default().fg(palette.muted)),
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

/// Styles for a message header, by sender
struct MessageStyles {
    prefix: &'static str,
    prefix_style: Style,
    content_style: Style,
    role_indicator: &'static str,
}

impl MessageStyles {
    fn for_sender(sender: Sender, palette: &Palette) -> Self {
        match sender {
            Sender::User => Self {
                prefix: "You",
                prefix_style: Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
                content_style: Style::default().fg(palette.text),
                role_indicator: ">",
            },
            Sender::Assistant => Self {
                prefix: "Assistant",
                prefix_style: palette.brand_title(),
                content_style: Style::default().fg(palette.text),
                role_indicator: "<",
            },
        }
    }
}

fn block_lines(block: &MessageBlock, palette: &Palette) -> Vec<Line<'static>> {
    let styles = MessageStyles::for_sender(block.sender, palette);
    let time = block.timestamp.with_timezone(&Local).format("%H:%M").to_string();
    let indent = " ".repeat(BODY_INDENT);

    let mut lines = Vec::with_capacity(block.height());
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {} ", styles.role_indicator),
            Style::default().fg(palette.muted),
        ),
        Span::styled(styles.prefix, styles.prefix_style),
        Span::styled(format!("  {}", time), Style::default().fg(palette.muted)),
    ]));
    for row in &block.body {
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(row.clone(), styles.content_style),
        ]));
    }
    if let Some(label) = &block.image {
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(
                label.clone(),
                Style::default().fg(palette.key).add_modifier(Modifier::ITALIC),
            ),
        ]));
    }
    lines
}

/// One `Line` per layout row, so scroll offsets index lines directly
fn transcript_lines(
    layout: &TranscriptLayout,
    loading: bool,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(layout.total_height());
    if layout.banner {
        let banner = if loading {
            " ⟳ Loading older messages..."
        } else {
            " ↑ Scroll up for older messages"
        };
        lines.push(Line::from(Span::styled(
            banner,
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    }
    for block in &layout.blocks {
        while lines.len() < block.top {
            lines.push(Line::from(""));
        }
        lines.extend(block_lines(block, palette));
    }
    while lines.len() < layout.total_height() {
        lines.push(Line::from(""));
    }
    lines
}

fn visible_rows(lines: Vec<Line<'static>>, offset: usize, height: usize) -> Vec<Line<'static>> {
    lines.into_iter().skip(offset).take(height).collect()
}

fn render_transcript(f: &mut Frame, app: &App, palette: &Palette, area: Rect, now: Instant) {
    let pane = &app.pane;
    let lines = if pane.active().is_some() {
        transcript_lines(pane.layout(), pane.loading_more(), palette)
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Select or create a chatroom to start.",
                Style::default().fg(palette.muted),
            )),
        ]
    };

    let mut title_spans = vec![Span::styled(" Conversation ", Style::default().fg(palette.text))];
    if pane.new_message_indicator_visible(now) {
        title_spans.push(Span::styled(
            " new message ",
            Style::default()
                .fg(palette.on_accent)
                .bg(palette.success)
                .add_modifier(Modifier::BOLD),
        ));
        title_spans.push(Span::raw(" "));
    }
    if pane.jump_to_latest_visible() {
        title_spans.push(Span::styled(
            "[End: jump to latest] ",
            Style::default().fg(palette.key),
        ));
    }

    // slice here rather than Paragraph::scroll, whose offset is a u16
    let lines = visible_rows(
        lines,
        pane.viewport().scroll_offset(),
        usize::from(area.height.saturating_sub(2)),
    );
    let focused = app.focus == Focus::Composer;
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::from(title_spans))
                    .border_style(Style::default().fg(if focused {
                        palette.accent
                    } else {
                        palette.border
                    })),
            ),
        area,
    );
}

fn render_composer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let focused = app.focus == Focus::Composer && app.mode == AppMode::Chat;
    let chip = app
        .attachment
        .as_ref()
        .map(|image| format!("image: {}", image.name));
    let mut config = TextInputConfig::new(app.composer.content(), " Message ")
        .with_placeholder(" Type a message, paste an image path, or Ctrl+V")
        .with_cursor_visible(focused)
        .with_cursor_position(app.composer.cursor_position());
    if let Some(chip) = chip.as_deref() {
        config = config.with_chip(chip);
    }
    components::render_text_input(f, area, palette, config);
}

fn render_chat_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (mode, keybindings): (&str, &[(&str, &str)]) = match app.focus {
        Focus::Composer => (
            "CHAT",
            &[
                ("Enter", "send"),
                ("PgUp/PgDn", "scroll"),
                ("End", "latest"),
                ("Esc", "rooms"),
            ],
        ),
        Focus::Search => ("SEARCH", &[("Type", "filter"), ("Enter", "done"), ("Esc", "clear")]),
        Focus::Sidebar => (
            "ROOMS",
            &[
                ("Enter", "open"),
                ("n", "new"),
                ("Del", "delete"),
                ("/", "search"),
                ("?", "help"),
            ],
        ),
    };
    let status: &[(&str, bool)] = &[("DARK", app.dark_mode)];
    components::render_navigation_footer(f, area, palette, mode, keybindings, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::store::MessageWindow;
    use crate::pane::types::{ChatMessage, MessageId};
    use chrono::Utc;

    fn message(text: &str, sender: Sender) -> ChatMessage {
        ChatMessage {
            id: MessageId::generate(),
            text: text.to_string(),
            sender,
            timestamp: Utc::now(),
            image: None,
        }
    }

    #[test]
    fn test_transcript_lines_match_layout_rows() {
        let messages = vec![
            message("hello there", Sender::User),
            message("a reply long enough to wrap over a few rows", Sender::Assistant),
        ];
        let window = MessageWindow {
            messages: &messages,
            has_more: true,
            total: 30,
        };
        let layout = TranscriptLayout::build(window, 20);
        let lines = transcript_lines(&layout, false, &Palette::DARK);
        assert_eq!(lines.len(), layout.total_height());
        for block in &layout.blocks {
            let header = lines.get(block.top).map(|line| line.to_string()).unwrap_or_default();
            assert!(header.contains("You") || header.contains("Assistant"));
        }
    }

    #[test]
    fn test_visible_rows_reach_past_u16_offsets() {
        let total = usize::from(u16::MAX) + 50;
        let lines: Vec<Line<'static>> = (0..total).map(|row| Line::from(row.to_string())).collect();
        let offset = usize::from(u16::MAX) + 10;
        let rows = visible_rows(lines, offset, 5);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].to_string(), offset.to_string());

        let short = visible_rows(vec![Line::from("only")], 0, 10);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_chat_areas_split_screen() {
        let areas = ChatAreas::new(Rect::new(0, 0, 100, 30));
        assert_eq!(areas.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(areas.transcript.height, 30 - 9);
        assert_eq!(areas.transcript_inner().width, 100 - SIDEBAR_WIDTH - 2);

        let narrow = ChatAreas::new(Rect::new(0, 0, 40, 20));
        assert_eq!(narrow.sidebar.width, 0);
        assert_eq!(narrow.transcript.width, 40);
    }
}
