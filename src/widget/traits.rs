//! Trait abstractions for the widget's collaborators
//!
//! These traits keep the core free of any view or storage technology and
//! let tests run the full runtime against mock implementations.

use super::event::UserAction;
use crate::db::{Database, DbError};
use crate::model::{ChatId, ChatSession, ChatSummary, Message, ModelChoice};
use crate::tour::{TargetRef, TourStepDefinition};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Reflects widget state into the host page.
///
/// The core only ever writes through this trait; it never reads layout or
/// styling back.
pub trait ViewRenderer: Send + 'static {
    /// Whether the host page has an element with this id
    fn has_mount_point(&self, container_id: &str) -> bool;

    /// Clear the mount point and build the empty interface into it
    fn build_interface(&mut self, container_id: &str);

    fn render_sidebar(&mut self, chats: &[ChatSummary]);

    /// Show the active chat's full history
    fn render_messages(&mut self, chat: &ChatSession);

    /// Show the welcome screen with starter prompts
    fn render_welcome(&mut self, prompts: &[&str]);

    /// Append one message below whatever is currently shown
    fn append_message(&mut self, message: &Message);

    /// Append a message that was also stored in `chat_id`
    fn append_chat_message(&mut self, _chat_id: &ChatId, message: &Message) {
        self.append_message(message);
    }

    fn show_typing_indicator(&mut self);
    fn hide_typing_indicator(&mut self);

    fn clear_input(&mut self) {}

    fn render_model_info(&mut self, _model: ModelChoice) {}

    fn render_thinking(&mut self, _enabled: bool) {}

    /// Highlight a region, looked up in the view as it is right now
    fn highlight(&mut self, target: TargetRef);

    fn show_step_box(&mut self, step: &TourStepDefinition, is_last: bool);

    /// Remove every tour highlight and step box
    fn clear_tour_decorations(&mut self);
}

/// Durable key-value flags, scoped by origin
pub trait FlagStore: Send + Sync + 'static {
    fn get_flag(&self, origin: &str, key: &str) -> Result<Option<String>, DbError>;

    fn set_flag(&self, origin: &str, key: &str, value: &str) -> Result<(), DbError>;

    fn clear_flag(&self, origin: &str, key: &str) -> Result<(), DbError>;
}

/// Delivers user actions to the widget
#[async_trait]
pub trait InputSource: Send + 'static {
    /// Next action, or `None` once the source is exhausted
    async fn next_action(&mut self) -> Option<UserAction>;
}

// ============================================================================
// Blanket and adapter implementations
// ============================================================================

impl<T: FlagStore + ?Sized> FlagStore for Arc<T> {
    fn get_flag(&self, origin: &str, key: &str) -> Result<Option<String>, DbError> {
        (**self).get_flag(origin, key)
    }

    fn set_flag(&self, origin: &str, key: &str, value: &str) -> Result<(), DbError> {
        (**self).set_flag(origin, key, value)
    }

    fn clear_flag(&self, origin: &str, key: &str) -> Result<(), DbError> {
        (**self).clear_flag(origin, key)
    }
}

impl FlagStore for Database {
    fn get_flag(&self, origin: &str, key: &str) -> Result<Option<String>, DbError> {
        Database::get_flag(self, origin, key)
    }

    fn set_flag(&self, origin: &str, key: &str, value: &str) -> Result<(), DbError> {
        Database::set_flag(self, origin, key, value)
    }

    fn clear_flag(&self, origin: &str, key: &str) -> Result<(), DbError> {
        Database::clear_flag(self, origin, key)
    }
}

#[async_trait]
impl InputSource for mpsc::Receiver<UserAction> {
    async fn next_action(&mut self) -> Option<UserAction> {
        self.recv().await
    }
}
