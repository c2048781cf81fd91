//! The chatroom message pane: store, windowing, and scroll behavior

pub mod anchor;
pub mod autoscroll;
pub mod layout;
pub mod store;
pub mod types;
pub mod viewport;

use crate::services::replies::ReplySource;
use crate::services::scheduler::{Scheduler, TaskId};
use anchor::{AnchorOutcome, AnchorSurface, ScrollAnchorController};
use autoscroll::{AutoScrollPolicy, ScrollDecision};
use layout::TranscriptLayout;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use store::{MessageStore, MessageWindow, ValidationError};
use thiserror::Error;
use types::{ChatMessage, ChatroomId, ImagePayload, NewMessage, Sender};
use viewport::TranscriptViewport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaneError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no chatroom is selected")]
    NoActiveChatroom,
}

/// Tunables for the pane; rows for thresholds, wall time for delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSettings {
    pub page_size: usize,
    pub top_threshold: usize,
    pub near_bottom_threshold: usize,
    pub indicator_duration: Duration,
    pub reply_delay: Duration,
    pub page_load_delay: Duration,
}

impl Default for PaneSettings {
    fn default() -> Self {
        Self {
            page_size: store::DEFAULT_PAGE_SIZE,
            top_threshold: 1,
            near_bottom_threshold: 3,
            indicator_duration: Duration::from_millis(2000),
            reply_delay: Duration::from_millis(1500),
            page_load_delay: Duration::from_millis(400),
        }
    }
}

/// Deferred pane work. `session` identifies the selection that queued it.
#[derive(Debug)]
enum PaneJob {
    AssistantReply { room: ChatroomId, session: u64 },
    LoadOlder { room: ChatroomId, session: u64 },
}

pub struct ChatPane {
    store: MessageStore,
    active: Option<ChatroomId>,
    session: u64,
    viewport: TranscriptViewport,
    anchor: ScrollAnchorController,
    autoscroll: AutoScrollPolicy,
    scheduler: Scheduler<PaneJob>,
    /// At most one queued page load per room
    page_loads: HashMap<ChatroomId, TaskId>,
    replies: Box<dyn ReplySource>,
    settings: PaneSettings,
}

impl ChatPane {
    pub fn new(settings: PaneSettings, replies: Box<dyn ReplySource>) -> Self {
        Self {
            store: MessageStore::new(settings.page_size),
            active: None,
            session: 0,
            viewport: TranscriptViewport::default(),
            anchor: ScrollAnchorController::new(settings.top_threshold),
            autoscroll: AutoScrollPolicy::new(
                settings.near_bottom_threshold,
                settings.indicator_duration,
            ),
            scheduler: Scheduler::new(),
            page_loads: HashMap::new(),
            replies,
            settings,
        }
    }

    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    #[must_use]
    pub fn active(&self) -> Option<&ChatroomId> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> &TranscriptViewport {
        &self.viewport
    }

    #[must_use]
    pub fn layout(&self) -> &TranscriptLayout {
        self.viewport.layout()
    }

    /// Loads persisted history for a room the store has not seen yet
    pub fn restore_history(&mut self, room: &ChatroomId, messages: Vec<ChatMessage>) -> bool {
        self.store.restore(room, messages)
    }

    /// Makes `room` the displayed chatroom. Returns the welcome message if
    /// the room was seeded by this call.
    pub fn on_select(&mut self, room: &ChatroomId) -> Option<ChatMessage> {
        let seeded = self.store.ensure_initialized(room);
        if let Some(task) = self.page_loads.remove(room) {
            self.scheduler.cancel(task);
            tracing::debug!(room = %room, "dropped page load from a previous visit");
        }
        self.store.reset_pagination(room);
        self.anchor.reset();
        self.autoscroll.reset();
        self.session += 1;
        self.active = Some(room.clone());
        self.rebuild();
        self.viewport.scroll_to_bottom();
        tracing::debug!(room = %room, session = self.session, "chatroom selected");
        seeded
    }

    pub fn on_delete(&mut self, room: &ChatroomId) {
        self.store.remove(room);
        let cancelled = self.scheduler.cancel_scope(room);
        self.page_loads.remove(room);
        if self.active.as_ref() == Some(room) {
            self.active = None;
            self.session += 1;
            self.anchor.reset();
            self.autoscroll.reset();
            self.rebuild();
        }
        tracing::debug!(room = %room, cancelled, "chatroom removed from pane");
    }

    /// Appends a user message to the active room and queues the reply
    pub fn send(
        &mut self,
        text: Option<String>,
        image: Option<ImagePayload>,
        now: Instant,
    ) -> Result<ChatMessage, PaneError> {
        let room = self.active.clone().ok_or(PaneError::NoActiveChatroom)?;
        let message = NewMessage {
            text,
            sender: Sender::User,
            image,
        };
        let created = self.store.append(&room, message)?;

        let was_near_bottom = self.near_bottom();
        self.rebuild();
        let decision = self.autoscroll.decide(Sender::User, was_near_bottom, now);
        self.apply(decision);

        self.autoscroll.note_user_send();
        let job = PaneJob::AssistantReply {
            room: room.clone(),
            session: self.session,
        };
        self.scheduler
            .schedule(now, self.settings.reply_delay, Some(room), job);
        Ok(created)
    }

    pub fn scroll_by(&mut self, delta: isize, now: Instant) {
        self.viewport.scroll_by(delta);
        self.after_scroll_change(now);
    }

    pub fn scroll_to_top(&mut self, now: Instant) {
        self.viewport.set_scroll_offset(0);
        self.after_scroll_change(now);
    }

    pub fn jump_to_latest(&mut self, now: Instant) {
        self.viewport.scroll_to_bottom();
        self.autoscroll.dismiss_indicator();
        self.after_scroll_change(now);
    }

    /// Re-wraps the transcript for a new viewport size
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.viewport.width() && height == self.viewport.height() {
            return;
        }
        let was_near_bottom = self.near_bottom();
        let anchor = self.viewport.topmost_visible();
        self.viewport.set_height(height);
        self.rebuild_at(width);
        if was_near_bottom {
            self.viewport.scroll_to_bottom();
            return;
        }
        // keep the top message on the same screen row after re-wrapping
        if let Some((id, offset)) = anchor {
            if let Some(current) = self.viewport.offset_of(&id) {
                let restored = self
                    .viewport
                    .scroll_offset()
                    .saturating_add_signed(current - offset);
                self.viewport.set_scroll_offset(restored);
            }
        }
    }

    /// Runs due timers. Returns the assistant messages appended, by room.
    pub fn tick(&mut self, now: Instant) -> Vec<(ChatroomId, ChatMessage)> {
        let mut appended = Vec::new();
        for job in self.scheduler.drain_due(now) {
            match job {
                PaneJob::AssistantReply { room, session } => {
                    if let Some(message) = self.deliver_reply(&room, session, now) {
                        appended.push((room, message));
                    }
                }
                PaneJob::LoadOlder { room, session } => {
                    self.finish_page_load(&room, session, now);
                }
            }
        }
        self.autoscroll.clear_expired(now);
        appended
    }

    #[must_use]
    pub fn window(&self) -> MessageWindow<'_> {
        match &self.active {
            Some(room) => self.store.window(room),
            None => MessageWindow::EMPTY,
        }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.window().has_more
    }

    #[must_use]
    pub fn loading_more(&self) -> bool {
        self.anchor.is_loading()
    }

    #[must_use]
    pub fn near_bottom(&self) -> bool {
        self.autoscroll.near_bottom(self.viewport.metrics())
    }

    #[must_use]
    pub fn new_message_indicator_visible(&self, now: Instant) -> bool {
        self.autoscroll.indicator_visible(now)
    }

    #[must_use]
    pub fn jump_to_latest_visible(&self) -> bool {
        self.active.is_some() && !self.near_bottom()
    }

    /// Newest message from `sender` in the active room's window
    #[must_use]
    pub fn latest_from(&self, sender: Sender) -> Option<&ChatMessage> {
        self.window()
            .messages
            .iter()
            .rev()
            .find(|message| message.sender == sender)
    }

    fn is_current(&self, room: &ChatroomId, session: u64) -> bool {
        self.session == session && self.active.as_ref() == Some(room)
    }

    fn deliver_reply(
        &mut self,
        room: &ChatroomId,
        session: u64,
        now: Instant,
    ) -> Option<ChatMessage> {
        let text = self.replies.next_reply();
        let was_near_bottom = self.near_bottom();
        let message = match self.store.append(room, NewMessage::assistant(text)) {
            Ok(message) => message,
            Err(error) => {
                tracing::warn!(room = %room, %error, "assistant reply rejected");
                return None;
            }
        };

        if self.active.as_ref() == Some(room) {
            self.rebuild();
        }
        if self.is_current(room, session) {
            let decision = self
                .autoscroll
                .decide(Sender::Assistant, was_near_bottom, now);
            self.apply(decision);
        } else {
            tracing::debug!(room = %room, "reply for a previous selection, view left untouched");
        }
        Some(message)
    }

    fn finish_page_load(&mut self, room: &ChatroomId, session: u64, now: Instant) {
        self.page_loads.remove(room);
        if self.is_current(room, session) {
            let advance = self.store.advance_page(room);
            self.rebuild();
            let outcome = self.anchor.complete_load(&mut self.viewport);
            tracing::debug!(room = %room, ?advance, ?outcome, "older page loaded");
            if outcome != AnchorOutcome::NotLoading {
                self.after_scroll_change(now);
            }
        } else if self.active.as_ref() == Some(room) {
            // reselection replaced the cursor this load was meant for
            tracing::debug!(room = %room, "page load from an earlier visit ignored");
        } else {
            let advance = self.store.advance_page(room);
            tracing::debug!(room = %room, ?advance, "page load landed on an inactive chatroom");
        }
    }

    fn apply(&mut self, decision: ScrollDecision) {
        match decision {
            ScrollDecision::ScrollToBottom => self.viewport.scroll_to_bottom(),
            ScrollDecision::ShowIndicator | ScrollDecision::Hold => {}
        }
    }

    fn after_scroll_change(&mut self, now: Instant) {
        if self.near_bottom() {
            self.autoscroll.dismiss_indicator();
        }
        let Some(room) = self.active.clone() else {
            return;
        };
        if self.page_loads.contains_key(&room) {
            return;
        }
        let has_more = self.store.window(&room).has_more;
        if self.anchor.on_scroll(&self.viewport, has_more) {
            let job = PaneJob::LoadOlder {
                room: room.clone(),
                session: self.session,
            };
            let task = self
                .scheduler
                .schedule(now, self.settings.page_load_delay, Some(room.clone()), job);
            self.page_loads.insert(room, task);
        }
    }

    fn rebuild(&mut self) {
        self.rebuild_at(self.viewport.width());
    }

    fn rebuild_at(&mut self, width: usize) {
        let layout = match &self.active {
            Some(room) => TranscriptLayout::build(self.store.window(room), width),
            None => TranscriptLayout::build(MessageWindow::EMPTY, width),
        };
        self.viewport.set_layout(layout);
    }
}
