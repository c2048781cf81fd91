use crate::app::App;
use crate::pane::PaneError;
use crate::pane::types::{ImagePayload, Sender};
use crate::services::attachments::{self, AttachmentError};
use std::path::Path;
use std::time::Instant;

impl App {
    pub fn add_composer_char(&mut self, character: char) {
        self.composer.add_char(character);
    }

    pub fn remove_composer_char(&mut self) {
        if self.composer.is_empty() && self.composer.cursor_position() == 0 {
            // Backspace on an empty composer drops the attachment
            if self.attachment.take().is_some() {
                self.show_status_toast("IMAGE REMOVED");
            }
            return;
        }
        self.composer.remove_char();
    }

    /// Sends the composer contents to the active chatroom
    pub fn submit_composer(&mut self, now: Instant) {
        let text = self.composer.content().trim().to_string();
        let text = (!text.is_empty()).then_some(text);
        match self.pane.send(text, self.attachment.clone(), now) {
            Ok(message) => {
                self.composer.clear();
                self.attachment = None;
                if let Some(room) = self.pane.active().cloned() {
                    self.persist_message(&room, &message);
                }
            }
            Err(PaneError::Validation(error)) => {
                tracing::debug!(%error, "nothing to send");
            }
            Err(PaneError::NoActiveChatroom) => {
                self.show_status_toast("SELECT A CHATROOM");
            }
        }
    }

    /// A pasted image path becomes the attachment; anything else is typed in
    pub fn handle_chat_paste(&mut self, text: &str) {
        if let Some(path) = attachments::parse_image_path(text) {
            self.attach_image_file(&path);
            return;
        }
        self.composer.insert_str(text);
    }

    pub fn handle_chat_clipboard_image(&mut self) {
        let png = match self.clipboard_service.read_image_png() {
            Ok(png) if !png.is_empty() => png,
            Ok(_) => {
                self.show_status_toast("NO IMAGE");
                return;
            }
            Err(error) => {
                tracing::debug!(%error, "no clipboard image");
                self.show_status_toast("NO IMAGE");
                return;
            }
        };
        let result = attachments::encode_image_bytes(&png, "clipboard.png");
        self.accept_attachment(result);
    }

    fn attach_image_file(&mut self, path: &Path) {
        let result = attachments::load_image_file(path);
        self.accept_attachment(result);
    }

    fn accept_attachment(&mut self, result: Result<ImagePayload, AttachmentError>) {
        match result {
            Ok(image) => {
                tracing::info!(name = %image.name, bytes = image.byte_len(), "image attached");
                self.attachment = Some(image);
                self.show_status_toast("IMAGE ADDED");
            }
            Err(AttachmentError::TooLarge { size, limit }) => {
                tracing::info!(size, limit, "image rejected");
                self.show_status_toast("IMAGE TOO LARGE");
            }
            Err(error) => {
                tracing::warn!(%error, "image rejected");
                self.show_status_toast("UNSUPPORTED IMAGE");
            }
        }
    }

    #[must_use]
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.pane
            .latest_from(Sender::Assistant)
            .map(|message| message.text.as_str())
    }

    /// Copies the newest assistant message to the system clipboard
    pub fn copy_latest_reply(&mut self) {
        let Some(message) = self.last_assistant_message().map(str::to_string) else {
            return;
        };
        if self.clipboard_service.copy_text(&message).is_ok() {
            self.show_status_toast("COPIED");
        } else {
            self.show_status_toast("COPY FAILED");
        }
    }
}
