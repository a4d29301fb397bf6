//! Simulated assistant replies
//!
//! Replies are picked by case-insensitive keyword matching; the first rule
//! that matches wins. A real backend plugs in through [`ReplySource`].

use crate::model::{Attachment, Message};
use async_trait::async_trait;
use std::sync::Arc;

pub const SUPERINDEX_REPLY: &str = "Here is the long term history of the Leading SuperIndex:";
pub const SUPERINDEX_CHART_TITLE: &str = "SuperIndex History";
pub const SUPERINDEX_CHART_SRC: &str = "../ra-chat-prototype/assets/samplechart_900.png";
pub const RECESSION_REPLY: &str = "Based on current leading indicators, the probability \
remains elevated. Our composite index suggests a 65% chance within the next 12 months.";
pub const FALLBACK_REPLY: &str = "This is a test response from the AI.";

const SUPERINDEX_CHART_BODY: &str = "You can also view the long term history of the Leading \
SuperIndex and its associated probability of recession & recession calls.";

/// Generated bot reply, not yet attached to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: vec![],
        }
    }

    pub fn into_message(self) -> Message {
        Message::bot(self.text).with_attachments(self.attachments)
    }
}

/// Pick the canned reply for a user message
pub fn generate_reply(user_text: &str) -> Reply {
    let lowered = user_text.to_lowercase();

    if lowered.contains("superindex") {
        Reply {
            text: SUPERINDEX_REPLY.to_string(),
            attachments: vec![Attachment::chart(SUPERINDEX_CHART_TITLE)
                .with_src(SUPERINDEX_CHART_SRC)
                .with_body(SUPERINDEX_CHART_BODY)],
        }
    } else if lowered.contains("recession") {
        Reply::text(RECESSION_REPLY)
    } else {
        Reply::text(FALLBACK_REPLY)
    }
}

/// Source of assistant replies
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, user_text: &str) -> Reply;
}

#[async_trait]
impl<T: ReplySource + ?Sized> ReplySource for Arc<T> {
    async fn reply(&self, user_text: &str) -> Reply {
        (**self).reply(user_text).await
    }
}

/// Keyword-matching reply source used in place of a model backend
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

#[async_trait]
impl ReplySource for KeywordResponder {
    async fn reply(&self, user_text: &str) -> Reply {
        generate_reply(user_text)
    }
}
