use crate::pane::types::{ChatMessage, Chatroom, ChatroomId, ImagePayload, Sender};
use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// The signed-in phone number, kept so later launches skip sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub country: String,
    pub phone: String,
    pub signed_in_at: String,
}

/// Internal chatroom record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatroomRecord {
    room_id: String,
    title: String,
    created_at: String,
}

/// Internal message record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageRecord {
    message_id: String,
    room_id: String,
    seq: i64,
    sender: String,
    text: String,
    image_name: Option<String>,
    image_data: Option<String>,
    timestamp: String,
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

impl ChatroomRecord {
    fn from_chatroom(room: &Chatroom) -> Self {
        Self {
            room_id: room.id.to_string(),
            title: room.title.clone(),
            created_at: format_timestamp(room.created_at),
        }
    }

    fn into_chatroom(self) -> Option<Chatroom> {
        Some(Chatroom {
            id: ChatroomId::from(self.room_id),
            title: self.title,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl MessageRecord {
    fn from_message(room: &ChatroomId, seq: usize, message: &ChatMessage) -> Self {
        Self {
            message_id: message.id.to_string(),
            room_id: room.to_string(),
            seq: i64::try_from(seq).unwrap_or(i64::MAX),
            sender: message.sender.as_str().to_string(),
            text: message.text.clone(),
            image_name: message.image.as_ref().map(|image| image.name.clone()),
            image_data: message.image.as_ref().map(|image| image.data_uri.clone()),
            timestamp: format_timestamp(message.timestamp),
        }
    }

    /// Rows that no longer parse are dropped rather than failing the load
    fn into_message(self) -> Option<ChatMessage> {
        let image = match (self.image_name, self.image_data) {
            (Some(name), Some(data_uri)) => Some(ImagePayload { name, data_uri }),
            (None, None) | (Some(_), None) | (None, Some(_)) => None,
        };
        Some(ChatMessage {
            id: self.message_id.parse().ok()?,
            text: self.text,
            sender: Sender::parse(&self.sender)?,
            timestamp: parse_timestamp(&self.timestamp)?,
            image,
        })
    }
}

/// Manages persistent storage of chatrooms, messages and the session
#[derive(Clone)]
pub struct StorageManager {
    db: Surreal<Db>,
}

impl StorageManager {
    /// Opens (or creates) the database at `path`
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Surreal::new::<RocksDb>(path.to_path_buf()).await?;
        db.use_ns("parlor").use_db("main").await?;

        let manager = Self { db };
        manager.init_db().await?;
        Ok(manager)
    }

    async fn init_db(&self) -> Result<()> {
        self.db.query("
            DEFINE TABLE IF NOT EXISTS chatroom SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS room_id ON chatroom TYPE string;
            DEFINE FIELD IF NOT EXISTS title ON chatroom TYPE string;
            DEFINE FIELD IF NOT EXISTS created_at ON chatroom TYPE string;
            DEFINE INDEX IF NOT EXISTS idx_chatroom_room ON chatroom FIELDS room_id UNIQUE;
        ").await?;

        self.db.query("
            DEFINE TABLE IF NOT EXISTS message SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS message_id ON message TYPE string;
            DEFINE FIELD IF NOT EXISTS room_id ON message TYPE string;
            DEFINE FIELD IF NOT EXISTS seq ON message TYPE int;
            DEFINE FIELD IF NOT EXISTS sender ON message TYPE string;
            DEFINE FIELD IF NOT EXISTS text ON message TYPE string;
            DEFINE FIELD IF NOT EXISTS image_name ON message TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS image_data ON message TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS timestamp ON message TYPE string;
            DEFINE INDEX IF NOT EXISTS idx_message_room ON message FIELDS room_id;
        ").await?;

        self.db.query("
            DEFINE TABLE IF NOT EXISTS session SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS country ON session TYPE string;
            DEFINE FIELD IF NOT EXISTS phone ON session TYPE string;
            DEFINE FIELD IF NOT EXISTS signed_in_at ON session TYPE string;
        ").await?;

        Ok(())
    }

    /// All chatrooms, oldest first
    pub async fn load_chatrooms(&self) -> Result<Vec<Chatroom>> {
        let mut response = self.db.query("
            SELECT room_id, title, created_at
            FROM chatroom
            ORDER BY created_at ASC
        ").await?;

        let records: Vec<ChatroomRecord> = response.take(0)?;
        Ok(records
            .into_iter()
            .filter_map(ChatroomRecord::into_chatroom)
            .collect())
    }

    pub async fn save_chatroom(&self, room: &Chatroom) -> Result<()> {
        let _: Option<ChatroomRecord> = self.db
            .create("chatroom")
            .content(ChatroomRecord::from_chatroom(room))
            .await?;
        Ok(())
    }

    /// Deletes a chatroom together with its messages
    pub async fn delete_chatroom(&self, room: &ChatroomId) -> Result<()> {
        // Delete messages first
        self.db.query("DELETE FROM message WHERE room_id = $room_id")
            .bind(("room_id", room.to_string()))
            .await?;
        self.db.query("DELETE FROM chatroom WHERE room_id = $room_id")
            .bind(("room_id", room.to_string()))
            .await?;
        Ok(())
    }

    /// `seq` is the message's position in its room
    pub async fn save_message(
        &self,
        room: &ChatroomId,
        seq: usize,
        message: &ChatMessage,
    ) -> Result<()> {
        let _: Option<MessageRecord> = self.db
            .create("message")
            .content(MessageRecord::from_message(room, seq, message))
            .await?;
        Ok(())
    }

    pub async fn load_messages(&self, room: &ChatroomId) -> Result<Vec<ChatMessage>> {
        let mut response = self.db.query("
            SELECT message_id, room_id, seq, sender, text, image_name, image_data, timestamp
            FROM message
            WHERE room_id = $room_id
            ORDER BY seq ASC
        ")
        .bind(("room_id", room.to_string()))
        .await?;

        let records: Vec<MessageRecord> = response.take(0)?;
        let total = records.len();
        let messages: Vec<ChatMessage> = records
            .into_iter()
            .filter_map(MessageRecord::into_message)
            .collect();
        if messages.len() != total {
            tracing::warn!(room = %room, dropped = total - messages.len(), "skipped unreadable messages");
        }
        Ok(messages)
    }

    pub async fn save_session(&self, session: &Session) -> Result<()> {
        self.clear_session().await?;
        let _: Option<Session> = self.db
            .create("session")
            .content(session.clone())
            .await?;
        Ok(())
    }

    pub async fn load_session(&self) -> Result<Option<Session>> {
        let mut response = self.db.query("
            SELECT country, phone, signed_in_at FROM session ORDER BY signed_in_at DESC LIMIT 1
        ").await?;
        let sessions: Vec<Session> = response.take(0)?;
        Ok(sessions.into_iter().next())
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.db.query("DELETE FROM session").await?;
        Ok(())
    }
}
