mod auth;
mod chat;
mod help;
mod navigation;
mod rooms;
mod scroll;
#[path = "text-input.rs"]
mod text_input;
mod types;

pub use navigation::Navigable;
pub use rooms::RoomNavigable;
pub use text_input::TextInput;
pub use types::*;

use crate::config::{Config, MessagePersistence};
use crate::pane::ChatPane;
use crate::pane::types::{ChatMessage, Chatroom, ChatroomId, ImagePayload};
use crate::services::clipboard::ClipboardService;
use crate::services::countries::Country;
use crate::services::replies::RandomReplies;
use crate::services::scheduler::Scheduler;
use crate::services::validation::FieldError;
use crate::storage::StorageManager;
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Application mode state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Auth,
    Chat,
    CreateRoom,
    DeleteRoom,
    Help,
}

/// Sign-in form state
#[derive(Debug, Clone)]
pub struct AuthState {
    pub step: AuthStep,
    pub field: AuthField,
    pub countries: Vec<Country>,
    /// Index into `countries`; `None` until the user picks one
    pub country: Option<usize>,
    pub phone: TextInput,
    pub otp: TextInput,
    pub error: Option<FieldError>,
}

impl AuthState {
    pub fn new(countries: Vec<Country>) -> Self {
        Self {
            step: AuthStep::Phone,
            field: AuthField::Country,
            countries,
            country: None,
            phone: TextInput::new(),
            otp: TextInput::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn selected_country(&self) -> Option<&Country> {
        self.country.and_then(|index| self.countries.get(index))
    }
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub previous_mode: Option<AppMode>,
    pub focus: Focus,
    pub should_quit: bool,
    pub config: Config,
    pub dark_mode: bool,

    // Sign-in
    pub auth: AuthState,
    pub auth_jobs: Scheduler<AuthJob>,

    // Chatroom list
    pub rooms: Vec<Chatroom>,
    pub room_index: usize,
    pub room_search: TextInput,
    pub room_title_input: TextInput,
    pub room_title_error: Option<FieldError>,
    pub pending_delete: Option<ChatroomId>,
    pub delete_confirmed: bool,

    // Message pane and composer
    pub pane: ChatPane,
    pub composer: TextInput,
    pub attachment: Option<ImagePayload>,

    pub status_toast: Option<StatusToast>,
    pub clipboard_service: ClipboardService,
    pub storage: Option<StorageManager>,
    pub storage_runtime: Option<tokio::runtime::Runtime>,
}

impl App {
    /// Creates the application; storage is attached separately
    pub fn new(config: Config, countries: Vec<Country>) -> Self {
        let replies = RandomReplies::from_settings(&config.assistant.replies, config.assistant.seed);
        let pane = ChatPane::new(config.pane.settings(), Box::new(replies));
        let dark_mode = config.theme.dark;

        Self {
            mode: AppMode::Auth,
            previous_mode: None,
            focus: Focus::Sidebar,
            should_quit: false,
            config,
            dark_mode,
            auth: AuthState::new(countries),
            auth_jobs: Scheduler::new(),
            rooms: Vec::new(),
            room_index: 0,
            room_search: TextInput::new(),
            room_title_input: TextInput::new(),
            room_title_error: None,
            pending_delete: None,
            delete_confirmed: false,
            pane,
            composer: TextInput::new(),
            attachment: None,
            status_toast: None,
            clipboard_service: ClipboardService::new(),
            storage: None,
            storage_runtime: None,
        }
    }

    /// Opens the database and restores chatrooms and any saved session
    pub fn init_storage(&mut self) {
        if !self.ensure_storage() {
            tracing::warn!("storage unavailable, running without persistence");
            return;
        }
        let loaded = self.storage_with_runtime().map(|(storage, runtime)| {
            let rooms = runtime.block_on(storage.load_chatrooms());
            let session = runtime.block_on(storage.load_session());
            (rooms, session)
        });
        let Some((rooms, session)) = loaded else {
            return;
        };

        match rooms {
            Ok(rooms) => {
                tracing::info!(count = rooms.len(), "restored chatrooms");
                self.rooms = rooms;
            }
            Err(error) => tracing::warn!(%error, "could not load chatrooms"),
        }
        match session {
            Ok(Some(session)) => {
                tracing::info!(country = %session.country, "resuming signed-in session");
                self.enter_dashboard();
            }
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "could not load session"),
        }
    }

    /// Runs everything that is due: sign-in timers, pane timers, toasts
    pub fn tick(&mut self, now: Instant) {
        for job in self.auth_jobs.drain_due(now) {
            self.handle_auth_job(job, now);
        }
        for (room, message) in self.pane.tick(now) {
            self.persist_message(&room, &message);
        }
        self.clear_expired_status_toast(now);
    }

    pub(crate) fn ensure_storage_runtime(&mut self) -> bool {
        if self.storage_runtime.is_some() {
            return true;
        }
        self.storage_runtime = tokio::runtime::Runtime::new().ok();
        self.storage_runtime.is_some()
    }

    pub(crate) fn ensure_storage(&mut self) -> bool {
        if self.storage.is_some() {
            return true;
        }
        if !self.ensure_storage_runtime() {
            return false;
        }
        let path = match self.config.database_path() {
            Ok(path) => path,
            Err(error) => {
                tracing::warn!(%error, "no database location");
                return false;
            }
        };
        let Some(runtime) = self.storage_runtime.as_ref() else {
            return false;
        };
        self.storage = match runtime.block_on(StorageManager::new(&path)) {
            Ok(storage) => Some(storage),
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "could not open database");
                None
            }
        };
        self.storage.is_some()
    }

    pub(crate) fn storage_with_runtime(&self) -> Option<(&StorageManager, &tokio::runtime::Runtime)> {
        Some((self.storage.as_ref()?, self.storage_runtime.as_ref()?))
    }

    #[must_use]
    pub fn durable_messages(&self) -> bool {
        self.config.storage.messages == MessagePersistence::Durable
    }

    /// Writes a message through when durable persistence is on
    pub(crate) fn persist_message(&self, room: &ChatroomId, message: &ChatMessage) {
        if !self.durable_messages() {
            return;
        }
        let Some((storage, runtime)) = self.storage_with_runtime() else {
            return;
        };
        let seq = self
            .pane
            .store()
            .position(room, &message.id)
            .unwrap_or_else(|| self.pane.store().len(room));
        if let Err(error) = runtime.block_on(storage.save_message(room, seq, message)) {
            tracing::warn!(room = %room, %error, "could not save message");
        }
    }

    pub fn show_status_toast(&mut self, message: impl Into<String>) {
        self.status_toast = Some(StatusToast::new(message, Instant::now()));
    }

    pub fn clear_expired_status_toast(&mut self, now: Instant) {
        let should_clear = self
            .status_toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now, TOAST_DURATION));
        if should_clear {
            self.status_toast = None;
        }
    }

    #[must_use]
    pub fn status_toast_message(&self) -> Option<&str> {
        self.status_toast.as_ref().map(|toast| toast.message.as_str())
    }

    /// Flips the palette and remembers the choice in the config file
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.config.theme.dark = self.dark_mode;
        if let Err(error) = self.config.save() {
            tracing::warn!(%error, "could not save theme preference");
        }
        self.show_status_toast(if self.dark_mode { "DARK MODE" } else { "LIGHT MODE" });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::services::countries::static_countries;

    /// App without storage, fixed reply seed and default timings
    pub fn app() -> App {
        let mut config = Config::default();
        config.assistant.seed = Some(11);
        App::new(config, static_countries())
    }
}
