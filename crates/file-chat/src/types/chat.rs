//! Chat transcript types

use serde::{Deserialize, Serialize};

/// File name offered for the transcript download
pub const EXPORT_FILENAME: &str = "chat_history.txt";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking
    User,
    /// The model answering
    Assistant,
}

impl Role {
    /// Prefix used in speaker labels
    pub fn label_prefix(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Bot",
        }
    }
}

/// A single (speaker-label, message) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    speaker: String,
    message: String,
    role: Role,
}

impl ChatTurn {
    fn new(role: Role, timestamp: &str, message: impl Into<String>) -> Self {
        Self {
            speaker: format!("{} [{}]", role.label_prefix(), timestamp),
            message: message.into(),
            role,
        }
    }

    /// Label such as `You [14:03:09]`
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Message text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Role marker used when rendering
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this turn carries a bot answer
    pub fn is_bot(&self) -> bool {
        self.speaker.contains(Role::Assistant.label_prefix())
    }

    /// `label: message` line used in the export
    pub fn export_line(&self) -> String {
        format!("{}: {}", self.speaker, self.message)
    }
}

/// Ordered log of turns for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one answered question: the user turn, then the bot turn,
    /// both stamped with the same timestamp
    pub fn record_exchange(&mut self, timestamp: &str, question: &str, answer: &str) {
        self.turns.push(ChatTurn::new(Role::User, timestamp, question));
        self.turns.push(ChatTurn::new(Role::Assistant, timestamp, answer));
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Turns in chronological order
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last message, if it came from the bot
    pub fn last_bot_message(&self) -> Option<&str> {
        self.last().filter(|t| t.is_bot()).map(|t| t.message())
    }

    /// Flattened download text: `label: message` per turn, blank line between
    pub fn export_text(&self) -> String {
        self.turns
            .iter()
            .map(ChatTurn::export_line)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Local wall-clock time formatted for speaker labels
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
