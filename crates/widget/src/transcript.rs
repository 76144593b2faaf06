use chrono::{DateTime, Utc};
use kolzo_core::dialogue::replies::ButtonSpec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub buttons: Vec<ButtonSpec>,
}

impl Message {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            sender: Sender::User,
            text: text.into(),
            timestamp,
            buttons: Vec::new(),
        }
    }

    pub fn bot(
        text: impl Into<String>,
        buttons: Vec<ButtonSpec>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self { id: MessageId::generate(), sender: Sender::Bot, text: text.into(), timestamp, buttons }
    }
}

/// Append-only message log; insertion order is the display order. The inner
/// vector is private so appended messages can never be edited or reordered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_bot(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|message| message.sender == Sender::Bot)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
