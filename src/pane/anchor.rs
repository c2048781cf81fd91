//! Load-older-on-top without visual jump
//!
//! Edge-triggered: reaching the top fires one load, and the trigger stays
//! disarmed until the viewer scrolls back above the threshold.

use super::types::MessageId;

/// Measurement capability the rendering layer provides to the controller
pub trait AnchorSurface {
    /// First item whose top edge lies inside the viewport, with its offset
    /// (in rows) from the viewport top
    fn topmost_visible(&self) -> Option<(MessageId, isize)>;

    /// Current offset of an item from the viewport top, if it is rendered
    fn offset_of(&self, id: &MessageId) -> Option<isize>;

    fn scroll_offset(&self) -> usize;

    fn set_scroll_offset(&mut self, offset: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScrollAnchor {
    message_id: MessageId,
    offset: isize,
    scroll_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Scroll offset moved by `delta` rows to keep the anchor in place
    Restored { delta: isize },
    /// Anchor was not captured or is no longer rendered
    Missed,
    NotLoading,
}

#[derive(Debug, Clone)]
pub struct ScrollAnchorController {
    threshold: usize,
    armed: bool,
    phase: LoadPhase,
    anchor: Option<ScrollAnchor>,
}

impl ScrollAnchorController {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            armed: true,
            phase: LoadPhase::Idle,
            anchor: None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Feeds a scroll position change. Returns true when an older page
    /// should be requested; the anchor has been captured by then.
    pub fn on_scroll(&mut self, surface: &impl AnchorSurface, has_more: bool) -> bool {
        let position = surface.scroll_offset();
        if position > self.threshold {
            self.armed = true;
            return false;
        }
        if !self.armed || self.is_loading() || !has_more {
            return false;
        }

        self.armed = false;
        self.phase = LoadPhase::Loading;
        self.anchor = surface
            .topmost_visible()
            .map(|(message_id, offset)| ScrollAnchor {
                message_id,
                offset,
                scroll_offset: position,
            });
        tracing::debug!(position, anchored = self.anchor.is_some(), "top reached, loading older page");
        true
    }

    /// Called once the extended window is laid out on the surface
    pub fn complete_load(&mut self, surface: &mut impl AnchorSurface) -> AnchorOutcome {
        if !self.is_loading() {
            return AnchorOutcome::NotLoading;
        }
        self.phase = LoadPhase::Idle;

        let Some(anchor) = self.anchor.take() else {
            return AnchorOutcome::Missed;
        };
        let Some(current) = surface.offset_of(&anchor.message_id) else {
            tracing::debug!(message = %anchor.message_id, "anchor not rendered after load, skipping restore");
            return AnchorOutcome::Missed;
        };

        let delta = current - anchor.offset;
        let restored = surface.scroll_offset().saturating_add_signed(delta);
        surface.set_scroll_offset(restored);
        tracing::debug!(
            delta,
            captured_at = anchor.scroll_offset,
            restored_to = surface.scroll_offset(),
            "restored scroll anchor"
        );
        AnchorOutcome::Restored { delta }
    }

    pub fn reset(&mut self) {
        self.armed = true;
        self.phase = LoadPhase::Idle;
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Items of uniform height stacked from row 0
    struct FixedRows {
        ids: Vec<MessageId>,
        item_height: usize,
        viewport: usize,
        scroll: usize,
    }

    impl FixedRows {
        fn new(count: usize, item_height: usize, viewport: usize) -> Self {
            Self {
                ids: (0..count).map(|_| MessageId::generate()).collect(),
                item_height,
                viewport,
                scroll: count * item_height - viewport,
            }
        }

        fn prepend(&mut self, count: usize) {
            let mut older: Vec<MessageId> = (0..count).map(|_| MessageId::generate()).collect();
            older.append(&mut self.ids);
            self.ids = older;
        }
    }

    impl AnchorSurface for FixedRows {
        fn topmost_visible(&self) -> Option<(MessageId, isize)> {
            self.ids.iter().enumerate().find_map(|(index, id)| {
                let top = index * self.item_height;
                (top >= self.scroll && top < self.scroll + self.viewport)
                    .then(|| (*id, top as isize - self.scroll as isize))
            })
        }

        fn offset_of(&self, id: &MessageId) -> Option<isize> {
            let index = self.ids.iter().position(|candidate| candidate == id)?;
            Some((index * self.item_height) as isize - self.scroll as isize)
        }

        fn scroll_offset(&self) -> usize {
            self.scroll
        }

        fn set_scroll_offset(&mut self, offset: usize) {
            self.scroll = offset;
        }
    }

    #[test]
    fn test_trigger_fires_once_while_pinned_to_top() {
        let mut surface = FixedRows::new(20, 3, 10);
        let mut controller = ScrollAnchorController::new(1);

        surface.scroll = 0;
        assert!(controller.on_scroll(&surface, true));
        assert!(controller.is_loading());
        assert!(!controller.on_scroll(&surface, true));
        assert!(!controller.on_scroll(&surface, true));
    }

    #[test]
    fn test_no_trigger_without_more_history() {
        let mut surface = FixedRows::new(5, 3, 10);
        let mut controller = ScrollAnchorController::new(1);
        surface.scroll = 0;
        assert!(!controller.on_scroll(&surface, false));
        assert_eq!(controller.phase(), LoadPhase::Idle);
        assert!(controller.is_armed());
    }

    #[test]
    fn test_rearms_only_after_rising_above_threshold() {
        let mut surface = FixedRows::new(20, 3, 10);
        let mut controller = ScrollAnchorController::new(1);

        surface.scroll = 1;
        assert!(controller.on_scroll(&surface, true));
        surface.prepend(20);
        assert_eq!(controller.complete_load(&mut surface), AnchorOutcome::Restored { delta: 60 });

        // Pinned at the top after the load: stays disarmed
        surface.scroll = 0;
        assert!(!controller.on_scroll(&surface, true));
        assert!(!controller.is_armed());

        surface.scroll = 5;
        assert!(!controller.on_scroll(&surface, true));
        assert!(controller.is_armed());

        surface.scroll = 0;
        assert!(controller.on_scroll(&surface, true));
    }

    #[test]
    fn test_restore_keeps_anchor_screen_offset() {
        let mut surface = FixedRows::new(20, 3, 12);
        let mut controller = ScrollAnchorController::new(1);

        surface.scroll = 1;
        let (anchor_id, before) = surface.topmost_visible().unwrap();
        assert!(controller.on_scroll(&surface, true));

        surface.prepend(20);
        let outcome = controller.complete_load(&mut surface);
        assert_eq!(outcome, AnchorOutcome::Restored { delta: 60 });
        assert_eq!(surface.offset_of(&anchor_id), Some(before));
        assert_eq!(surface.scroll, 61);
    }

    #[test]
    fn test_missing_anchor_is_skipped() {
        let mut surface = FixedRows::new(20, 3, 10);
        let mut controller = ScrollAnchorController::new(1);
        surface.scroll = 0;
        assert!(controller.on_scroll(&surface, true));

        // Window replaced entirely
        surface.ids = (0..40).map(|_| MessageId::generate()).collect();
        assert_eq!(controller.complete_load(&mut surface), AnchorOutcome::Missed);
        assert_eq!(surface.scroll, 0);
        assert!(!controller.is_loading());

        surface.scroll = 9;
        controller.on_scroll(&surface, true);
        surface.scroll = 0;
        assert!(controller.on_scroll(&surface, true));
    }

    #[test]
    fn test_complete_without_load_is_noop() {
        let mut surface = FixedRows::new(10, 3, 10);
        let mut controller = ScrollAnchorController::new(1);
        let scroll = surface.scroll;
        assert_eq!(controller.complete_load(&mut surface), AnchorOutcome::NotLoading);
        assert_eq!(surface.scroll, scroll);
    }

    #[test]
    fn test_reset_clears_in_flight_load() {
        let mut surface = FixedRows::new(20, 3, 10);
        let mut controller = ScrollAnchorController::new(1);
        surface.scroll = 0;
        assert!(controller.on_scroll(&surface, true));
        controller.reset();
        assert!(!controller.is_loading());
        assert!(controller.is_armed());
        assert_eq!(controller.complete_load(&mut surface), AnchorOutcome::NotLoading);
    }
}
