//! Follow-the-tail decisions for newly appended messages

use super::types::Sender;
use std::time::{Duration, Instant};

/// Scroll geometry of the transcript viewport, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportMetrics {
    pub scroll_top: usize,
    pub viewport_height: usize,
    pub content_height: usize,
}

impl ViewportMetrics {
    #[must_use]
    pub fn distance_from_bottom(&self) -> usize {
        self.content_height
            .saturating_sub(self.scroll_top.saturating_add(self.viewport_height))
    }
}

#[must_use]
pub fn is_near_bottom(metrics: ViewportMetrics, threshold: usize) -> bool {
    metrics.distance_from_bottom() <= threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    ScrollToBottom,
    ShowIndicator,
    Hold,
}

#[derive(Debug, Clone)]
pub struct AutoScrollPolicy {
    near_bottom_threshold: usize,
    indicator_duration: Duration,
    indicator_since: Option<Instant>,
    pending_replies: usize,
}

impl AutoScrollPolicy {
    pub fn new(near_bottom_threshold: usize, indicator_duration: Duration) -> Self {
        Self {
            near_bottom_threshold,
            indicator_duration,
            indicator_since: None,
            pending_replies: 0,
        }
    }

    #[must_use]
    pub fn near_bottom(&self, metrics: ViewportMetrics) -> bool {
        is_near_bottom(metrics, self.near_bottom_threshold)
    }

    /// Records that the user sent something an assistant reply will answer
    pub fn note_user_send(&mut self) {
        self.pending_replies = self.pending_replies.saturating_add(1);
    }

    pub fn decide(&mut self, sender: Sender, was_near_bottom: bool, now: Instant) -> ScrollDecision {
        match sender {
            Sender::User => {
                self.indicator_since = None;
                ScrollDecision::ScrollToBottom
            }
            Sender::Assistant => {
                let prompted = self.pending_replies > 0;
                self.pending_replies = self.pending_replies.saturating_sub(1);
                if was_near_bottom {
                    self.indicator_since = None;
                    ScrollDecision::ScrollToBottom
                } else if prompted {
                    self.indicator_since = Some(now);
                    ScrollDecision::ShowIndicator
                } else {
                    ScrollDecision::Hold
                }
            }
        }
    }

    #[must_use]
    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.indicator_since
            .is_some_and(|since| now.saturating_duration_since(since) < self.indicator_duration)
    }

    pub fn clear_expired(&mut self, now: Instant) {
        if !self.indicator_visible(now) {
            self.indicator_since = None;
        }
    }

    pub fn dismiss_indicator(&mut self) {
        self.indicator_since = None;
    }

    pub fn reset(&mut self) {
        self.indicator_since = None;
        self.pending_replies = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AutoScrollPolicy {
        AutoScrollPolicy::new(3, Duration::from_millis(2000))
    }

    #[test]
    fn test_near_bottom_uses_distance_from_content_end() {
        let metrics = ViewportMetrics {
            scroll_top: 80,
            viewport_height: 17,
            content_height: 100,
        };
        assert_eq!(metrics.distance_from_bottom(), 3);
        assert!(is_near_bottom(metrics, 3));
        assert!(!is_near_bottom(metrics, 2));

        let short = ViewportMetrics {
            scroll_top: 0,
            viewport_height: 40,
            content_height: 10,
        };
        assert!(is_near_bottom(short, 0));
    }

    #[test]
    fn test_user_messages_always_scroll() {
        let mut policy = policy();
        let now = Instant::now();
        assert_eq!(policy.decide(Sender::User, false, now), ScrollDecision::ScrollToBottom);
        assert_eq!(policy.decide(Sender::User, true, now), ScrollDecision::ScrollToBottom);
    }

    #[test]
    fn test_assistant_follows_only_near_bottom() {
        let mut policy = policy();
        let now = Instant::now();

        policy.note_user_send();
        assert_eq!(policy.decide(Sender::Assistant, true, now), ScrollDecision::ScrollToBottom);
        assert!(!policy.indicator_visible(now));

        policy.note_user_send();
        assert_eq!(policy.decide(Sender::Assistant, false, now), ScrollDecision::ShowIndicator);
        assert!(policy.indicator_visible(now));
    }

    #[test]
    fn test_unprompted_assistant_message_holds() {
        let mut policy = policy();
        let now = Instant::now();
        assert_eq!(policy.decide(Sender::Assistant, false, now), ScrollDecision::Hold);
        assert!(!policy.indicator_visible(now));
    }

    #[test]
    fn test_indicator_expires_after_duration() {
        let mut policy = policy();
        let now = Instant::now();
        policy.note_user_send();
        policy.decide(Sender::Assistant, false, now);

        assert!(policy.indicator_visible(now + Duration::from_millis(1999)));
        assert!(!policy.indicator_visible(now + Duration::from_millis(2000)));

        policy.clear_expired(now + Duration::from_millis(500));
        assert!(policy.indicator_visible(now + Duration::from_millis(600)));
        policy.clear_expired(now + Duration::from_secs(5));
        assert!(!policy.indicator_visible(now + Duration::from_millis(600)));
    }

    #[test]
    fn test_reset_forgets_pending_replies() {
        let mut policy = policy();
        let now = Instant::now();
        policy.note_user_send();
        policy.reset();
        assert_eq!(policy.decide(Sender::Assistant, false, now), ScrollDecision::Hold);
    }
}
