use super::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const SEPARATOR: &str = "  ";
const CURSOR: &str = "█";

/// Configuration for text input rendering
pub struct TextInputConfig<'a> {
    pub content: &'a str,
    pub title: &'a str,
    pub placeholder: Option<&'a str>,
    pub show_cursor: bool,
    pub cursor_position: Option<usize>,
    pub chip: Option<&'a str>,
}

impl<'a> TextInputConfig<'a> {
    pub fn new(content: &'a str, title: &'a str) -> Self {
        Self {
            content,
            title,
            placeholder: None,
            show_cursor: true,
            cursor_position: None,
            chip: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_cursor_visible(mut self, show_cursor: bool) -> Self {
        self.show_cursor = show_cursor;
        self
    }

    /// Sets cursor position (character index)
    pub fn with_cursor_position(mut self, cursor_position: usize) -> Self {
        self.cursor_position = Some(cursor_position);
        self
    }

    /// Shows a label chip before the text, used for attachments
    pub fn with_chip(mut self, chip: &'a str) -> Self {
        self.chip = Some(chip);
        self
    }
}

/// Renders a bordered single-line input with a cursor indicator
pub fn render_text_input(frame: &mut Frame, area: Rect, palette: &Palette, config: TextInputConfig) {
    let cursor_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::SLOW_BLINK);
    let text_style = Style::default().fg(palette.text);

    let mut spans = vec![Span::styled(
        "> ",
        Style::default().fg(if config.show_cursor { palette.accent } else { palette.muted }),
    )];
    let mut used_width = 2;
    if let Some(chip) = config.chip {
        let chip_text = format!(" {} ", chip);
        used_width += chip_text.chars().count() + 1;
        spans.push(Span::styled(
            chip_text,
            Style::default()
                .fg(palette.on_accent)
                .bg(palette.key)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if config.content.is_empty() {
        if config.show_cursor {
            spans.push(Span::styled(CURSOR, cursor_style));
        }
        if let Some(placeholder) = config.placeholder {
            spans.push(Span::styled(placeholder, Style::default().fg(palette.muted)));
        }
    } else {
        let inner_width = usize::from(area.width.saturating_sub(2));
        let cursor_width = usize::from(config.show_cursor);
        let available_width = inner_width.saturating_sub(used_width + cursor_width).max(1);
        let cursor_index = config
            .cursor_position
            .unwrap_or_else(|| config.content.chars().count());
        let (start, end) = visible_window(config.content, cursor_index, available_width);
        let visible_content = slice_by_chars(config.content, start, end);
        let visible_length = visible_content.chars().count();
        let relative_cursor = cursor_index.saturating_sub(start).min(visible_length);

        spans.push(Span::styled(
            slice_by_chars(&visible_content, 0, relative_cursor),
            text_style,
        ));
        if config.show_cursor {
            spans.push(Span::styled(CURSOR, cursor_style));
        }
        spans.push(Span::styled(
            slice_by_chars(&visible_content, relative_cursor, visible_length),
            text_style,
        ));
    }

    let border_color = if config.show_cursor {
        palette.accent
    } else {
        palette.border
    };

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(config.title, Style::default().fg(palette.text)))
                .border_style(Style::default().fg(border_color)),
        ),
        area,
    );
}

fn visible_window(content: &str, cursor: usize, width: usize) -> (usize, usize) {
    let length = content.chars().count();
    let cursor = cursor.min(length);
    if length <= width {
        return (0, length);
    }
    let mut start = cursor.saturating_sub(width.saturating_sub(1));
    if start + width > length {
        start = length.saturating_sub(width);
    }
    (start, start + width)
}

fn slice_by_chars(value: &str, start: usize, end: usize) -> String {
    value
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Renders a footer with mode indicator, keybindings, and status
pub fn render_navigation_footer(
    f: &mut Frame,
    area: Rect,
    palette: &Palette,
    mode: &str,
    keybindings: &[(&str, &str)],
    status: &[(&str, bool)],
) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            format!(" {} ", mode),
            Style::default()
                .fg(palette.on_accent)
                .bg(palette.brand)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    for &(key, desc) in keybindings {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(palette.on_accent).bg(palette.key),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(palette.text),
        ));
    }

    for &(label, active) in status {
        spans.push(Span::raw(SEPARATOR));
        if active {
            spans.push(Span::styled(
                format!(" {} ", label),
                Style::default()
                    .fg(palette.on_accent)
                    .bg(palette.success)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", label),
                Style::default().fg(palette.muted),
            ));
        }
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        ),
        area,
    );
}

pub fn render_status_toast(frame: &mut Frame, area: Rect, palette: &Palette, message: &str) {
    let toast = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {} ", message),
        Style::default()
            .fg(palette.on_accent)
            .bg(palette.key)
            .add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Right);

    frame.render_widget(toast, area);
}

/// The single-row strip just inside a bordered area's top edge
#[must_use]
pub fn toast_area(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.min(1),
    }
}
