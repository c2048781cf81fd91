use crate::app::{App, AppMode, Focus, Navigable};
use crate::pane::types::{Chatroom, ChatroomId};
use crate::services::validation;

// Navigation over the filtered chatroom list
pub struct RoomNavigable<'a> {
    app: &'a mut App,
}

impl<'a> RoomNavigable<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }
}

impl<'a> Navigable for RoomNavigable<'a> {
    fn get_item_count(&self) -> usize {
        self.app.filtered_rooms().len()
    }

    fn get_selected_index(&self) -> usize {
        self.app.room_index
    }

    fn set_selected_index(&mut self, index: usize) {
        self.app.room_index = index;
    }
}

impl App {
    /// Chatrooms whose title contains the trimmed search query, ignoring case
    #[must_use]
    pub fn filtered_rooms(&self) -> Vec<&Chatroom> {
        let query = self.room_search.content().trim().to_lowercase();
        if query.is_empty() {
            return self.rooms.iter().collect();
        }
        self.rooms
            .iter()
            .filter(|room| room.title.to_lowercase().contains(&query))
            .collect()
    }

    #[must_use]
    pub fn highlighted_room(&self) -> Option<&Chatroom> {
        self.filtered_rooms().get(self.room_index).copied()
    }

    #[must_use]
    pub fn active_room(&self) -> Option<&Chatroom> {
        let active = self.pane.active()?;
        self.rooms.iter().find(|room| &room.id == active)
    }

    pub fn next_room(&mut self) {
        RoomNavigable::new(self).next_item();
    }

    pub fn previous_room(&mut self) {
        RoomNavigable::new(self).previous_item();
    }

    /// Opens the highlighted chatroom in the message pane
    pub fn open_highlighted_room(&mut self) {
        let Some(room) = self.highlighted_room().map(|room| room.id.clone()) else {
            return;
        };
        self.select_room(&room);
        self.focus = Focus::Composer;
    }

    pub(crate) fn select_room(&mut self, room: &ChatroomId) {
        if self.durable_messages() && !self.pane.store().contains(room) {
            self.restore_room_history(room);
        }
        if let Some(welcome) = self.pane.on_select(room) {
            self.persist_message(room, &welcome);
        }
        tracing::info!(room = %room, "chatroom opened");
    }

    fn restore_room_history(&mut self, room: &ChatroomId) {
        let loaded = self
            .storage_with_runtime()
            .map(|(storage, runtime)| runtime.block_on(storage.load_messages(room)));
        match loaded {
            Some(Ok(messages)) if !messages.is_empty() => {
                tracing::debug!(room = %room, count = messages.len(), "restoring history");
                self.pane.restore_history(room, messages);
            }
            Some(Ok(_)) | None => {}
            Some(Err(error)) => tracing::warn!(room = %room, %error, "could not load history"),
        }
    }

    // Search

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    pub fn add_search_char(&mut self, character: char) {
        self.room_search.add_char(character);
        self.room_index = 0;
    }

    pub fn remove_search_char(&mut self) {
        self.room_search.remove_char();
        self.room_index = 0;
    }

    pub fn clear_search(&mut self) {
        self.room_search.clear();
        self.room_index = 0;
        self.focus = Focus::Sidebar;
    }

    // Create dialog

    pub fn open_create_room(&mut self) {
        self.room_title_input.clear();
        self.room_title_error = None;
        self.mode = AppMode::CreateRoom;
    }

    pub fn cancel_create_room(&mut self) {
        self.room_title_input.clear();
        self.room_title_error = None;
        self.mode = AppMode::Chat;
    }

    pub fn add_title_char(&mut self, character: char) {
        self.room_title_input.add_char(character);
        self.room_title_error = None;
    }

    pub fn remove_title_char(&mut self) {
        self.room_title_input.remove_char();
        self.room_title_error = None;
    }

    pub fn create_room(&mut self) {
        let title = self.room_title_input.content().trim().to_string();
        if let Err(error) = validation::validate_title(&title) {
            self.room_title_error = Some(error);
            return;
        }

        let room = Chatroom::new(title);
        if let Some((storage, runtime)) = self.storage_with_runtime()
            && let Err(error) = runtime.block_on(storage.save_chatroom(&room))
        {
            tracing::warn!(%error, "could not save chatroom");
        }
        tracing::info!(room = %room.id, title = %room.title, "chatroom created");

        let id = room.id.clone();
        self.rooms.push(room);
        self.room_search.clear();
        self.room_index = self.rooms.len().saturating_sub(1);
        self.cancel_create_room();
        self.select_room(&id);
        self.focus = Focus::Composer;
        self.show_status_toast("Chatroom created!");
    }

    // Delete dialog

    pub fn open_delete_room(&mut self) {
        let Some(room) = self.highlighted_room().map(|room| room.id.clone()) else {
            return;
        };
        self.pending_delete = Some(room);
        self.delete_confirmed = false;
        self.mode = AppMode::DeleteRoom;
    }

    pub fn toggle_delete_choice(&mut self) {
        self.delete_confirmed = !self.delete_confirmed;
    }

    pub fn cancel_delete_room(&mut self) {
        self.pending_delete = None;
        self.delete_confirmed = false;
        self.mode = AppMode::Chat;
    }

    /// Applies the dialog's current choice
    pub fn submit_delete_dialog(&mut self) {
        if self.delete_confirmed {
            self.delete_room();
        } else {
            self.cancel_delete_room();
        }
    }

    pub fn delete_room(&mut self) {
        let Some(room) = self.pending_delete.take() else {
            self.cancel_delete_room();
            return;
        };
        self.rooms.retain(|candidate| candidate.id != room);
        self.pane.on_delete(&room);
        if let Some((storage, runtime)) = self.storage_with_runtime()
            && let Err(error) = runtime.block_on(storage.delete_chatroom(&room))
        {
            tracing::warn!(room = %room, %error, "could not delete chatroom");
        }
        tracing::info!(room = %room, "chatroom deleted");

        RoomNavigable::new(self).clamp_selection();
        if self.pane.active().is_none() {
            self.focus = Focus::Sidebar;
        }
        self.cancel_delete_room();
        self.show_status_toast("Chatroom deleted.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use crate::services::validation::FieldError;
    use std::time::{Duration, Instant};

    fn create(app: &mut App, title: &str) -> ChatroomId {
        app.open_create_room();
        for character in title.chars() {
            app.add_title_char(character);
        }
        app.create_room();
        app.rooms.last().map(|room| room.id.clone()).unwrap()
    }

    #[test]
    fn test_create_validates_title_length() {
        let mut app = app();
        app.open_create_room();
        app.add_title_char('a');
        app.create_room();
        assert_eq!(app.room_title_error, Some(FieldError::TitleTooShort));
        assert_eq!(app.mode, AppMode::CreateRoom);
        assert!(app.rooms.is_empty());

        for _ in 0..40 {
            app.add_title_char('b');
        }
        app.create_room();
        assert_eq!(app.room_title_error, Some(FieldError::TitleTooLong));
        assert!(app.rooms.is_empty());
    }

    #[test]
    fn test_created_room_is_selected_with_welcome() {
        let mut app = app();
        let id = create(&mut app, "  Trip planning ");
        assert_eq!(app.mode, AppMode::Chat);
        assert_eq!(app.rooms.len(), 1);
        assert_eq!(app.rooms[0].title, "Trip planning");
        assert_eq!(app.pane.active(), Some(&id));
        assert_eq!(app.pane.window().len(), 1);
        assert_eq!(app.status_toast_message(), Some("Chatroom created!"));
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let mut app = app();
        create(&mut app, "Work");
        create(&mut app, "Weekend plans");
        create(&mut app, "Homework");

        for character in "  WORK ".chars() {
            app.add_search_char(character);
        }
        let titles: Vec<&str> = app
            .filtered_rooms()
            .iter()
            .map(|room| room.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Work", "Homework"]);

        app.next_room();
        assert_eq!(app.highlighted_room().map(|room| room.title.as_str()), Some("Homework"));
        app.next_room();
        assert_eq!(app.highlighted_room().map(|room| room.title.as_str()), Some("Work"));

        app.clear_search();
        assert_eq!(app.filtered_rooms().len(), 3);
    }

    #[test]
    fn test_delete_requires_confirmation_and_cancels_reply() {
        let mut app = app();
        create(&mut app, "Scratch");
        let doomed = create(&mut app, "Doomed");
        let now = Instant::now();
        app.composer.insert_str("hello?");
        app.submit_composer(now);

        app.room_index = 1;
        app.open_delete_room();
        assert_eq!(app.mode, AppMode::DeleteRoom);
        app.submit_delete_dialog();
        assert_eq!(app.rooms.len(), 2);
        assert_eq!(app.mode, AppMode::Chat);

        app.open_delete_room();
        app.toggle_delete_choice();
        app.submit_delete_dialog();
        assert_eq!(app.rooms.len(), 1);
        assert_eq!(app.status_toast_message(), Some("Chatroom deleted."));
        assert!(app.pane.active().is_none());
        assert_eq!(app.room_index, 0);

        app.tick(now + Duration::from_secs(10));
        assert!(!app.pane.store().contains(&doomed));
    }
}
