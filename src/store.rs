//! Session store
//!
//! Owns every chat session and the active-chat pointer. All mutations of
//! chat history go through this type; nothing else holds a mutable view of
//! the sessions.

mod seed;


pub use seed::{seed_chats, STARTER_PROMPTS};

use crate::model::{ChatId, ChatSession, ChatSummary, Message};
use chrono::Utc;
use thiserror::Error;

/// Title given to chats created without an initial message
pub const DEFAULT_CHAT_TITLE: &str = "New Conversation";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Chat not found: {0}")]
    NotFound(ChatId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory chat sessions, kept in creation order
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    chats: Vec<ChatSession>,
    /// `None` means no chat is selected and the welcome screen is shown
    active: Option<ChatId>,
    /// Last timestamp handed out as an id, so same-millisecond creations
    /// still get distinct ids
    last_stamp: i64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo conversations, no chat selected
    pub fn seeded() -> Self {
        Self::with_chats(seed_chats())
    }

    pub fn with_chats(chats: impl IntoIterator<Item = ChatSession>) -> Self {
        let mut store = Self::new();
        for chat in chats {
            if store.contains(&chat.id) {
                tracing::warn!(chat_id = %chat.id, "Skipping duplicate seeded chat");
                continue;
            }
            store.chats.push(chat);
        }
        store
    }

    /// Allocate a new chat, make it active and return its id
    pub fn create_chat(&mut self, initial_text: Option<&str>) -> ChatId {
        let id = self.next_id();
        let title = initial_text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CHAT_TITLE);

        self.chats.push(ChatSession::new(id.clone(), title));
        self.active = Some(id.clone());
        tracing::debug!(chat_id = %id, "Created chat");
        id
    }

    /// Make `id` the active chat. On error the active chat is left unchanged.
    pub fn select_chat(&mut self, id: &ChatId) -> StoreResult<()> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// Overwrite a chat's title. Blank titles are ignored; returns whether
    /// the title changed.
    pub fn rename_chat(&mut self, id: &ChatId, new_title: &str) -> StoreResult<bool> {
        let chat = self.chat_mut(id)?;
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return Ok(false);
        }
        new_title.clone_into(&mut chat.title);
        Ok(true)
    }

    /// Append to the end of a chat's history, returning the new length
    pub fn append_message(&mut self, chat_id: &ChatId, message: Message) -> StoreResult<usize> {
        let chat = self.chat_mut(chat_id)?;
        chat.messages.push(message);
        Ok(chat.messages.len())
    }

    /// Deselect the active chat without creating a new one
    pub fn clear_active_selection(&mut self) {
        self.active = None;
    }

    pub fn active_chat_id(&self) -> Option<&ChatId> {
        self.active.as_ref()
    }

    pub fn active_chat(&self) -> Option<&ChatSession> {
        self.active.as_ref().and_then(|id| self.chat(id))
    }

    pub fn chat(&self, id: &ChatId) -> Option<&ChatSession> {
        self.chats.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ChatId) -> bool {
        self.chat(id).is_some()
    }

    pub fn chats(&self) -> impl Iterator<Item = &ChatSession> {
        self.chats.iter()
    }

    /// Sidebar rows in creation order
    pub fn summaries(&self) -> Vec<ChatSummary> {
        self.chats
            .iter()
            .map(|c| ChatSummary {
                id: c.id.clone(),
                title: c.title.clone(),
                active: self.active.as_ref() == Some(&c.id),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    fn chat_mut(&mut self, id: &ChatId) -> StoreResult<&mut ChatSession> {
        self.chats
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn next_id(&mut self) -> ChatId {
        let mut stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        loop {
            let id = ChatId::new(format!("chat-{stamp}"));
            if !self.contains(&id) {
                self.last_stamp = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}
