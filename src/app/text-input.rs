/// Single-line editable text with a character cursor
#[derive(Debug, Clone)]
pub struct TextInput {
    content: String,
    cursor_index: usize,
}

impl TextInput {
    /// Creates a new empty text input
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor_index: 0,
        }
    }

    /// Inserts a character at the cursor
    pub fn add_char(&mut self, character: char) {
        let insert_index = char_to_byte_index(&self.content, self.cursor_index);
        self.content.insert(insert_index, character);
        self.cursor_index = self.cursor_index.saturating_add(1);
    }

    /// Inserts pasted text at the cursor, dropping line breaks
    pub fn insert_str(&mut self, text: &str) {
        for character in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.add_char(character);
        }
    }

    /// Removes the character before the cursor (backspace)
    pub fn remove_char(&mut self) {
        if self.cursor_index == 0 {
            return;
        }
        let end_index = char_to_byte_index(&self.content, self.cursor_index);
        let start_index = char_to_byte_index(&self.content, self.cursor_index.saturating_sub(1));
        if start_index < end_index {
            self.content.replace_range(start_index..end_index, "");
            self.cursor_index = self.cursor_index.saturating_sub(1);
        }
    }

    /// Removes the character at the cursor (delete)
    pub fn delete_char(&mut self) {
        let length = self.content.chars().count();
        if self.cursor_index >= length {
            return;
        }
        let start_index = char_to_byte_index(&self.content, self.cursor_index);
        let end_index = char_to_byte_index(&self.content, self.cursor_index.saturating_add(1));
        if start_index < end_index {
            self.content.replace_range(start_index..end_index, "");
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_index = self.cursor_index.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let length = self.content.chars().count();
        if self.cursor_index < length {
            self.cursor_index += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor_index = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor_index = self.content.chars().count();
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns cursor position in characters
    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor_index
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_index = 0;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.cursor_index = self.content.chars().count();
    }
}

fn char_to_byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or_else(|| value.len(), |(index, _)| index)
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}
