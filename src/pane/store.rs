//! Per-chatroom message sequences and pagination cursors
//!
//! The store is the single owner of message data. Windows grow from the
//! tail backward: the newest messages are always visible and each page
//! extends the window toward older history.

use super::types::{ChatMessage, ChatroomId, MessageId, NewMessage, Sender};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 20;

const WELCOME_TEXT: &str = "Welcome to this chatroom!";
/// How far the welcome message is backdated from the seeding instant
const WELCOME_LEAD_SECONDS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a message needs text or an image")]
    EmptyMessage,
}

/// Result of a page advance. Both variants are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdvance {
    Extended { visible: usize },
    Complete,
}

/// The visible, tail-anchored slice of a chatroom
#[derive(Debug, Clone, Copy)]
pub struct MessageWindow<'a> {
    pub messages: &'a [ChatMessage],
    pub has_more: bool,
    pub total: usize,
}

impl MessageWindow<'_> {
    pub const EMPTY: MessageWindow<'static> = MessageWindow {
        messages: &[],
        has_more: false,
        total: 0,
    };

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone)]
struct RoomLog {
    messages: Vec<ChatMessage>,
    page: usize,
}

impl RoomLog {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            page: 1,
        }
    }

    fn visible_len(&self, page_size: usize) -> usize {
        self.page
            .saturating_mul(page_size)
            .min(self.messages.len())
    }

    /// Never earlier than the newest message, so order follows call order
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        self.messages
            .last()
            .map_or(now, |last| now.max(last.timestamp))
    }
}

#[derive(Debug, Clone)]
pub struct MessageStore {
    rooms: HashMap<ChatroomId, RoomLog>,
    page_size: usize,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl MessageStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn contains(&self, room: &ChatroomId) -> bool {
        self.rooms.contains_key(room)
    }

    #[must_use]
    pub fn len(&self, room: &ChatroomId) -> usize {
        self.rooms.get(room).map_or(0, |log| log.messages.len())
    }

    #[must_use]
    pub fn page(&self, room: &ChatroomId) -> Option<usize> {
        self.rooms.get(room).map(|log| log.page)
    }

    /// Seeds a room with its welcome message the first time it is seen.
    /// Returns the seeded message, or `None` when the room already exists.
    pub fn ensure_initialized(&mut self, room: &ChatroomId) -> Option<ChatMessage> {
        if self.rooms.contains_key(room) {
            return None;
        }
        let welcome = ChatMessage {
            id: MessageId::generate(),
            text: WELCOME_TEXT.to_string(),
            sender: Sender::Assistant,
            timestamp: Utc::now() - Duration::seconds(WELCOME_LEAD_SECONDS),
            image: None,
        };
        let mut log = RoomLog::new();
        log.messages.push(welcome.clone());
        self.rooms.insert(room.clone(), log);
        tracing::debug!(room = %room, "seeded chatroom");
        Some(welcome)
    }

    /// Loads persisted history into a room that has not been seen yet.
    /// Returns false (and changes nothing) if the room already exists.
    pub fn restore(&mut self, room: &ChatroomId, mut messages: Vec<ChatMessage>) -> bool {
        if self.rooms.contains_key(room) || messages.is_empty() {
            return false;
        }
        messages.sort_by_key(|message| message.timestamp);
        let mut log = RoomLog::new();
        log.messages = messages;
        self.rooms.insert(room.clone(), log);
        true
    }

    /// Appends to the tail of a room. Fails without mutating anything when
    /// the message carries neither text nor an image.
    pub fn append(
        &mut self,
        room: &ChatroomId,
        message: NewMessage,
    ) -> Result<ChatMessage, ValidationError> {
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let log = self.rooms.entry(room.clone()).or_insert_with(RoomLog::new);
        let created = ChatMessage {
            id: MessageId::generate(),
            text: message.text.unwrap_or_default(),
            sender: message.sender,
            timestamp: log.next_timestamp(),
            image: message.image,
        };
        log.messages.push(created.clone());
        Ok(created)
    }

    #[must_use]
    pub fn window(&self, room: &ChatroomId) -> MessageWindow<'_> {
        let Some(log) = self.rooms.get(room) else {
            return MessageWindow::EMPTY;
        };
        let total = log.messages.len();
        let visible = log.visible_len(self.page_size);
        let start = total - visible;
        MessageWindow {
            messages: log.messages.get(start..).unwrap_or_default(),
            has_more: visible < total,
            total,
        }
    }

    pub fn advance_page(&mut self, room: &ChatroomId) -> PageAdvance {
        let page_size = self.page_size;
        let Some(log) = self.rooms.get_mut(room) else {
            return PageAdvance::Complete;
        };
        if log.visible_len(page_size) >= log.messages.len() {
            return PageAdvance::Complete;
        }
        log.page += 1;
        PageAdvance::Extended {
            visible: log.visible_len(page_size),
        }
    }

    pub fn reset_pagination(&mut self, room: &ChatroomId) {
        if let Some(log) = self.rooms.get_mut(room) {
            log.page = 1;
        }
    }

    /// Drops a room's sequence and cursor. Returns whether it existed.
    pub fn remove(&mut self, room: &ChatroomId) -> bool {
        self.rooms.remove(room).is_some()
    }

    /// Index of a message within its room's full sequence
    #[must_use]
    pub fn position(&self, room: &ChatroomId, id: &MessageId) -> Option<usize> {
        self.rooms
            .get(room)?
            .messages
            .iter()
            .rposition(|message| message.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::types::ImagePayload;

    fn room() -> ChatroomId {
        ChatroomId::from("room-a")
    }

    fn filled_store(count: usize) -> MessageStore {
        let mut store = MessageStore::new(20);
        for index in 0..count {
            store
                .append(&room(), NewMessage::user(format!("message {}", index)))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_append_rejects_empty_message_without_mutation() {
        let mut store = MessageStore::default();
        store.ensure_initialized(&room());

        let blank = NewMessage {
            text: Some("   ".to_string()),
            sender: Sender::User,
            image: None,
        };
        let missing = NewMessage {
            text: None,
            sender: Sender::User,
            image: None,
        };

        assert_eq!(store.append(&room(), blank), Err(ValidationError::EmptyMessage));
        assert_eq!(store.append(&room(), missing), Err(ValidationError::EmptyMessage));
        assert_eq!(store.len(&room()), 1);

        let untouched = ChatroomId::from("never-seen");
        let missing = NewMessage {
            text: None,
            sender: Sender::Assistant,
            image: None,
        };
        assert!(store.append(&untouched, missing).is_err());
        assert!(!store.contains(&untouched));
    }

    #[test]
    fn test_append_accepts_image_without_text() {
        let mut store = MessageStore::default();
        let image = ImagePayload {
            name: "cat.png".to_string(),
            data_uri: "data:image/png;base64,AAAA".to_string(),
        };
        let message = NewMessage {
            text: None,
            sender: Sender::User,
            image: Some(image),
        };
        let created = store.append(&room(), message).unwrap();
        assert!(created.text.is_empty());
        assert!(created.image.is_some());
    }

    #[test]
    fn test_window_order_matches_append_order() {
        let store = filled_store(30);
        let window = store.window(&room());
        let texts: Vec<&str> = window.messages.iter().map(|m| m.text.as_str()).collect();
        let expected: Vec<String> = (10..30).map(|i| format!("message {}", i)).collect();
        assert_eq!(texts, expected);
        assert!(
            window
                .messages
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp)
        );
    }

    #[test]
    fn test_pagination_extends_toward_older_history() {
        let mut store = filled_store(45);

        let window = store.window(&room());
        assert_eq!(window.len(), 20);
        assert!(window.has_more);
        assert_eq!(window.messages.last().unwrap().text, "message 44");

        assert_eq!(store.advance_page(&room()), PageAdvance::Extended { visible: 40 });
        let window = store.window(&room());
        assert_eq!(window.len(), 40);
        assert!(window.has_more);
        assert_eq!(window.messages.first().unwrap().text, "message 5");

        assert_eq!(store.advance_page(&room()), PageAdvance::Extended { visible: 45 });
        let window = store.window(&room());
        assert_eq!(window.len(), 45);
        assert!(!window.has_more);

        assert_eq!(store.advance_page(&room()), PageAdvance::Complete);
        let window = store.window(&room());
        assert_eq!(window.len(), 45);
        assert!(!window.has_more);
    }

    #[test]
    fn test_window_never_shrinks_or_overflows() {
        let mut store = filled_store(57);
        let mut previous = store.window(&room()).len();
        for _ in 0..6 {
            store.advance_page(&room());
            let current = store.window(&room()).len();
            assert!(current >= previous);
            assert!(current <= 57);
            previous = current;
        }
        assert_eq!(previous, 57);
    }

    #[test]
    fn test_reset_pagination_returns_to_first_page() {
        let mut store = filled_store(70);
        store.advance_page(&room());
        store.advance_page(&room());
        assert_eq!(store.page(&room()), Some(3));

        store.reset_pagination(&room());
        assert_eq!(store.page(&room()), Some(1));
        assert_eq!(store.window(&room()).len(), 20);
    }

    #[test]
    fn test_ensure_initialized_seeds_single_welcome() {
        let mut store = MessageStore::default();
        let seeded = store.ensure_initialized(&room());
        assert!(seeded.is_some());
        assert!(store.ensure_initialized(&room()).is_none());

        let window = store.window(&room());
        assert_eq!(window.len(), 1);
        let welcome = window.messages[0].clone();
        assert_eq!(welcome.sender, Sender::Assistant);

        let sent = store.append(&room(), NewMessage::user("hi")).unwrap();
        assert!(welcome.timestamp < sent.timestamp);
    }

    #[test]
    fn test_remove_discards_sequence_and_cursor() {
        let mut store = filled_store(25);
        store.advance_page(&room());
        assert!(store.remove(&room()));
        assert!(!store.remove(&room()));
        assert_eq!(store.window(&room()).total, 0);
        assert_eq!(store.page(&room()), None);

        store.ensure_initialized(&room());
        assert_eq!(store.window(&room()).len(), 1);
    }

    #[test]
    fn test_unknown_room_is_safe() {
        let mut store = MessageStore::default();
        let ghost = ChatroomId::from("ghost");
        assert!(store.window(&ghost).is_empty());
        assert_eq!(store.advance_page(&ghost), PageAdvance::Complete);
        store.reset_pagination(&ghost);
        assert!(!store.contains(&ghost));
    }

    #[test]
    fn test_restore_only_fills_unseen_rooms() {
        let source = filled_store(3);
        let history: Vec<ChatMessage> = source.window(&room()).messages.to_vec();

        let mut store = MessageStore::default();
        assert!(store.restore(&room(), history.clone()));
        let texts: Vec<&str> = store.window(&room()).messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["message 0", "message 1", "message 2"]);
        assert!(!store.restore(&room(), history));

        // a restored room counts as initialized
        assert!(store.ensure_initialized(&room()).is_none());
    }

    #[test]
    fn test_position_indexes_full_sequence() {
        let mut store = filled_store(25);
        let latest = store.append(&room(), NewMessage::assistant("reply")).unwrap();
        assert_eq!(store.position(&room(), &latest.id), Some(25));
        assert_eq!(store.position(&room(), &MessageId::generate()), None);
    }
}
