use super::store::MessageWindow;
use super::types::{ChatMessage, MessageId, Sender};
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Indentation of message bodies under their header
pub const BODY_INDENT: usize = 3;
/// Blank rows between two message blocks
const BLOCK_GAP: usize = 1;
const BOTTOM_PADDING: usize = 1;

/// One laid-out message: header row, wrapped body rows, optional image row
#[derive(Debug, Clone)]
pub struct MessageBlock {
    pub id: MessageId,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub top: usize,
    pub body: Vec<String>,
    pub image: Option<String>,
}

impl MessageBlock {
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.body.len() + usize::from(self.image.is_some())
    }
}

/// Row positions of the current window at a given width
#[derive(Debug, Clone, Default)]
pub struct TranscriptLayout {
    pub banner: bool,
    pub blocks: Vec<MessageBlock>,
    pub width: usize,
    total_height: usize,
}

impl TranscriptLayout {
    pub fn build(window: MessageWindow<'_>, width: usize) -> Self {
        let body_width = width.saturating_sub(BODY_INDENT + 1).max(1);
        let mut cursor = usize::from(window.has_more);
        let mut blocks = Vec::with_capacity(window.len());

        for message in window.messages {
            cursor += BLOCK_GAP;
            let block = MessageBlock {
                id: message.id,
                sender: message.sender,
                timestamp: message.timestamp,
                top: cursor,
                body: wrap_text(&message.text, body_width, 1),
                image: image_label(message),
            };
            cursor += block.height();
            blocks.push(block);
        }

        Self {
            banner: window.has_more,
            blocks,
            width,
            total_height: cursor + BOTTOM_PADDING,
        }
    }

    #[must_use]
    pub fn total_height(&self) -> usize {
        self.total_height
    }

    #[must_use]
    pub fn block(&self, id: &MessageId) -> Option<&MessageBlock> {
        self.blocks.iter().find(|block| block.id == *id)
    }
}

fn image_label(message: &ChatMessage) -> Option<String> {
    message.image.as_ref().map(|image| {
        let kib = image.byte_len() as f64 / 1024.0;
        format!("[image: {} · {} · {:.1} KiB]", image.name, image.mime(), kib)
    })
}

pub fn wrap_text(text: &str, max_width: usize, max_empty_lines: usize) -> Vec<String> {
    let mut lines = wrap_text_impl(text, max_width);
    trim_empty_edges(&mut lines);
    collapse_empty_lines(&mut lines, max_empty_lines);
    lines
}

fn wrap_text_impl(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for raw_line in text.lines() {
        if raw_line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let characters: Vec<char> = raw_line.chars().collect();
        let mut start = 0usize;
        let mut width = 0usize;
        let mut last_space: Option<usize> = None;
        let mut index = 0usize;

        while let Some(&character) = characters.get(index) {
            let char_width = UnicodeWidthChar::width(character).unwrap_or(0).max(1);

            if character.is_whitespace() {
                last_space = Some(index);
            }

            if width + char_width > max_width && width > 0 {
                let end = last_space.filter(|space| *space > start).unwrap_or(index);
                lines.push(collect_range(&characters, start, end).trim_end().to_string());

                start = if characters.get(end).is_some_and(|c| c.is_whitespace()) {
                    end + 1
                } else {
                    end
                };
                index = start;
                width = 0;
                last_space = None;
                continue;
            }

            width += char_width;
            index += 1;
        }

        if start < characters.len() {
            lines.push(
                collect_range(&characters, start, characters.len())
                    .trim_end()
                    .to_string(),
            );
        }
    }
    lines
}

fn collect_range(characters: &[char], start: usize, end: usize) -> String {
    characters
        .get(start..end)
        .map(|slice| slice.iter().collect())
        .unwrap_or_default()
}

fn trim_empty_edges(lines: &mut Vec<String>) {
    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
}

fn collapse_empty_lines(lines: &mut Vec<String>, max_empty_lines: usize) {
    if max_empty_lines == 0 {
        lines.retain(|line| !line.is_empty());
        return;
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut empty_run = 0usize;
    for line in lines.iter() {
        if line.is_empty() {
            empty_run += 1;
            if empty_run <= max_empty_lines {
                result.push(String::new());
            }
        } else {
            empty_run = 0;
            result.push(line.clone());
        }
    }
    *lines = result;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::store::MessageStore;
    use crate::pane::types::{ChatroomId, ImagePayload, NewMessage};

    #[test]
    fn test_wrap_text_breaks_on_spaces() {
        let lines = wrap_text("the quick brown fox jumps", 10, 1);
        assert_eq!(lines, ["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4, 1);
        assert_eq!(lines, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_collapses_blank_runs() {
        let lines = wrap_text("\n\nfirst\n\n\n\nsecond\n\n", 20, 1);
        assert_eq!(lines, ["first", "", "second"]);
    }

    #[test]
    fn test_wrap_text_counts_wide_characters() {
        let lines = wrap_text("日本語テキスト", 6, 1);
        assert_eq!(lines, ["日本語", "テキス", "ト"]);
    }

    #[test]
    fn test_layout_positions_blocks_with_gaps() {
        let room = ChatroomId::from("layout");
        let mut store = MessageStore::new(20);
        store.append(&room, NewMessage::user("one")).unwrap();
        store
            .append(&room, NewMessage::assistant("a reply that is long enough to wrap twice"))
            .unwrap();
        let image = ImagePayload {
            name: "dot.png".to_string(),
            data_uri: "data:image/png;base64,AAAAAAAA".to_string(),
        };
        store
            .append(&room, NewMessage::user("look").with_image(image))
            .unwrap();

        let layout = TranscriptLayout::build(store.window(&room), 24);
        assert!(!layout.banner);
        let tops: Vec<usize> = layout.blocks.iter().map(|block| block.top).collect();
        let heights: Vec<usize> = layout.blocks.iter().map(MessageBlock::height).collect();
        assert_eq!(heights[0], 2);
        assert!(heights[1] >= 3);
        assert_eq!(heights[2], 3);
        assert_eq!(tops[0], 1);
        assert_eq!(tops[1], tops[0] + heights[0] + 1);
        assert_eq!(tops[2], tops[1] + heights[1] + 1);
        assert_eq!(layout.total_height(), tops[2] + heights[2] + 1);
    }

    #[test]
    fn test_layout_reserves_banner_row_when_history_remains() {
        let room = ChatroomId::from("banner");
        let mut store = MessageStore::new(2);
        for index in 0..3 {
            store.append(&room, NewMessage::user(format!("m{}", index))).unwrap();
        }
        let layout = TranscriptLayout::build(store.window(&room), 40);
        assert!(layout.banner);
        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.blocks[0].top, 2);
    }
}
