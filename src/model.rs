//! Chat data model
//!
//! Messages and attachments are immutable once appended to a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Short label shown in the avatar next to a message
    pub fn avatar_label(self) -> &'static str {
        match self {
            Role::User => "ME",
            Role::Bot => "AI",
        }
    }
}

/// Kind of supplementary content carried by a bot message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Chart,
    Article,
}

/// Descriptive payload rendered under a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl Attachment {
    pub fn chart(title: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Chart,
            title: title.into(),
            meta: None,
            body: None,
            src: None,
        }
    }

    pub fn article(title: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Article,
            title: title.into(),
            meta: None,
            body: None,
            src: None,
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachments: vec![],
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            attachments: vec![],
        }
    }

    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments.extend(attachments);
        self
    }
}

/// Identifier of a chat session, never reused within a store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A named conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: ChatId,
    pub title: String,
    pub messages: Vec<Message>,
}

impl ChatSession {
    pub fn new(id: ChatId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }
}

/// Sidebar row for one chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: ChatId,
    pub title: String,
    pub active: bool,
}

/// Assistant model offered in the sidebar selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    #[default]
    Gpt,
    Gemini,
}

impl ModelChoice {
    /// Version label shown under the selector
    pub fn info_label(self) -> &'static str {
        match self {
            ModelChoice::Gpt => "GPT 5.1",
            ModelChoice::Gemini => "Gemini 3",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gpt" => Some(ModelChoice::Gpt),
            "gemini" => Some(ModelChoice::Gemini),
            _ => None,
        }
    }
}
