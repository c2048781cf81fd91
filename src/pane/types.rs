use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque chatroom identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatroomId(String);

impl ChatroomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatroomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChatroomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ChatroomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque message identifier, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Sender::User),
            "assistant" => Some(Sender::Assistant),
            _ => None,
        }
    }
}

/// Inline image carried by a message (data-URI form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub name: String,
    pub data_uri: String,
}

impl ImagePayload {
    /// Approximate decoded size of the payload in bytes
    #[must_use]
    pub fn byte_len(&self) -> usize {
        let encoded = self
            .data_uri
            .split_once(',')
            .map_or(self.data_uri.as_str(), |(_, data)| data);
        let padding = encoded.chars().rev().take_while(|c| *c == '=').count();
        (encoded.len() / 4 * 3).saturating_sub(padding)
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        self.data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map_or("application/octet-stream", |(mime, _)| mime)
    }
}

/// A message stored in a chatroom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub image: Option<ImagePayload>,
}

/// Append request; ids and timestamps are always assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub text: Option<String>,
    pub sender: Sender,
    pub image: Option<ImagePayload>,
}

impl NewMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sender: Sender::User,
            image: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sender: Sender::Assistant,
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// True when there is neither non-blank text nor an image
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let has_text = self
            .text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty());
        !has_text && self.image.is_none()
    }
}

/// A named conversation container, owned by the chatroom list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chatroom {
    pub id: ChatroomId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Chatroom {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ChatroomId::generate(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}
