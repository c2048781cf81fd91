mod auth;
mod chat;
mod components;
mod dialogs;
mod help;
mod rooms;
mod theme;
mod utils;

pub use chat::ChatAreas;
pub use utils::contains;

use crate::app::{App, AppMode};
use ratatui::Frame;
use theme::Palette;

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Auth => auth::render_auth_view(f, app),
        AppMode::Chat => chat::render_chat_view(f, app),
        AppMode::CreateRoom => {
            // Chat view stays visible behind the dialog
            chat::render_chat_view(f, app);
            dialogs::render_create_room(f, app, &Palette::for_mode(app.dark_mode));
        }
        AppMode::DeleteRoom => {
            chat::render_chat_view(f, app);
            dialogs::render_delete_room(f, app, &Palette::for_mode(app.dark_mode));
        }
        AppMode::Help => help::render_help_view(f, app),
    }
}
