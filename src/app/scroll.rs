use std::time::Instant;

impl crate::app::App {
    pub fn scroll_chat_up_lines(&mut self, lines: usize, now: Instant) {
        let delta = isize::try_from(lines).unwrap_or(isize::MAX);
        self.pane.scroll_by(-delta, now);
    }

    pub fn scroll_chat_down_lines(&mut self, lines: usize, now: Instant) {
        let delta = isize::try_from(lines).unwrap_or(isize::MAX);
        self.pane.scroll_by(delta, now);
    }

    /// One viewport minus a row of overlap
    fn page_lines(&self) -> usize {
        self.pane.viewport().height().saturating_sub(1).max(1)
    }

    pub fn scroll_chat_up_page(&mut self, now: Instant) {
        self.scroll_chat_up_lines(self.page_lines(), now);
    }

    pub fn scroll_chat_down_page(&mut self, now: Instant) {
        self.scroll_chat_down_lines(self.page_lines(), now);
    }

    pub fn jump_to_top(&mut self, now: Instant) {
        self.pane.scroll_to_top(now);
    }

    pub fn jump_to_bottom(&mut self, now: Instant) {
        self.pane.jump_to_latest(now);
    }

    /// Keeps the pane's wrap width and height in step with the terminal
    pub fn resize_transcript(&mut self, width: u16, height: u16) {
        self.pane.resize(usize::from(width), usize::from(height));
    }
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::app;
    use std::time::Instant;

    #[test]
    fn test_page_scroll_and_jump_to_latest() {
        let mut app = app();
        app.open_create_room();
        app.room_title_input.insert_str("Long");
        app.create_room();
        app.resize_transcript(30, 4);

        let now = Instant::now();
        for index in 0..6 {
            app.composer.insert_str(&format!("message {}", index));
            app.submit_composer(now);
        }
        assert!(app.pane.near_bottom());

        app.scroll_chat_up_page(now);
        app.scroll_chat_up_page(now);
        assert!(!app.pane.near_bottom());
        assert!(app.pane.jump_to_latest_visible());

        app.jump_to_bottom(now);
        assert!(app.pane.near_bottom());
    }
}
