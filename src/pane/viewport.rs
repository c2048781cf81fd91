use super::anchor::AnchorSurface;
use super::autoscroll::ViewportMetrics;
use super::layout::TranscriptLayout;
use super::types::MessageId;

/// A laid-out transcript seen through a window of `height` rows
#[derive(Debug, Clone, Default)]
pub struct TranscriptViewport {
    layout: TranscriptLayout,
    scroll_top: usize,
    height: usize,
}

impl TranscriptViewport {
    #[must_use]
    pub fn layout(&self) -> &TranscriptLayout {
        &self.layout
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn set_layout(&mut self, layout: TranscriptLayout) {
        self.layout = layout;
        self.clamp();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp();
    }

    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.layout.total_height().saturating_sub(self.height)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.set_scroll_offset(self.scroll_top.saturating_add_signed(delta));
    }

    #[must_use]
    pub fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.height,
            content_height: self.layout.total_height(),
        }
    }

    fn clamp(&mut self) {
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }
}

impl AnchorSurface for TranscriptViewport {
    fn topmost_visible(&self) -> Option<(MessageId, isize)> {
        let bottom = self.scroll_top + self.height;
        self.layout
            .blocks
            .iter()
            .find(|block| block.top >= self.scroll_top && block.top < bottom)
            .map(|block| (block.id, block.top as isize - self.scroll_top as isize))
    }

    fn offset_of(&self, id: &MessageId) -> Option<isize> {
        self.layout
            .block(id)
            .map(|block| block.top as isize - self.scroll_top as isize)
    }

    fn scroll_offset(&self) -> usize {
        self.scroll_top
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_top = offset.min(self.max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::store::MessageStore;
    use crate::pane::types::{ChatroomId, NewMessage};

    fn viewport_with(count: usize, height: usize) -> TranscriptViewport {
        let room = ChatroomId::from("viewport");
        let mut store = MessageStore::new(50);
        for index in 0..count {
            store.append(&room, NewMessage::user(format!("line {}", index))).unwrap();
        }
        let mut viewport = TranscriptViewport::default();
        viewport.set_height(height);
        viewport.set_layout(TranscriptLayout::build(store.window(&room), 40));
        viewport
    }

    #[test]
    fn test_scroll_offset_is_clamped_to_content() {
        // 10 blocks of 2 rows plus gaps: 30 rows + padding
        let mut viewport = viewport_with(10, 8);
        assert_eq!(viewport.layout().total_height(), 31);
        viewport.set_scroll_offset(500);
        assert_eq!(viewport.scroll_offset(), 23);
        viewport.scroll_by(-100);
        assert_eq!(viewport.scroll_offset(), 0);
    }

    #[test]
    fn test_topmost_visible_skips_partially_hidden_blocks() {
        let mut viewport = viewport_with(10, 8);
        // block tops are 1, 4, 7, ...
        viewport.set_scroll_offset(2);
        let (id, offset) = viewport.topmost_visible().unwrap();
        assert_eq!(id, viewport.layout().blocks[1].id);
        assert_eq!(offset, 2);
        assert_eq!(viewport.offset_of(&viewport.layout().blocks[0].id), Some(-1));
    }

    #[test]
    fn test_metrics_report_bottom_distance() {
        let mut viewport = viewport_with(10, 8);
        viewport.scroll_to_bottom();
        assert_eq!(viewport.metrics().distance_from_bottom(), 0);
        viewport.scroll_by(-5);
        assert_eq!(viewport.metrics().distance_from_bottom(), 5);
    }

    #[test]
    fn test_short_content_has_no_scroll_range() {
        let mut viewport = viewport_with(2, 30);
        viewport.scroll_by(10);
        assert_eq!(viewport.scroll_offset(), 0);
        assert_eq!(viewport.max_scroll(), 0);
    }
}
