use crate::app::{App, AppMode};

impl App {
    pub fn open_help(&mut self) {
        if self.mode != AppMode::Help {
            self.previous_mode = Some(self.mode);
        }
        self.mode = AppMode::Help;
    }

    pub fn close_help(&mut self) {
        self.mode = self.previous_mode.take().unwrap_or(AppMode::Chat);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppMode;
    use crate::app::test_support::app;

    #[test]
    fn test_help_returns_to_previous_mode() {
        let mut app = app();
        assert_eq!(app.mode, AppMode::Auth);
        app.open_help();
        app.open_help();
        assert_eq!(app.mode, AppMode::Help);
        app.close_help();
        assert_eq!(app.mode, AppMode::Auth);
    }
}
