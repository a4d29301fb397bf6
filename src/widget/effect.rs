//! Effects produced by event handling

use crate::model::{ChatId, Message, ModelChoice};
use crate::tour::TourEffect;

/// Effects to be executed after the model has been updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Redraw the chat list from the store
    RenderSidebar,

    /// Redraw the active chat, or the welcome screen when none is active
    RenderMessages,

    ShowTypingIndicator,
    HideTypingIndicator,

    /// Empty the text input
    ClearInput,

    /// Deliver a bot reply to `chat_id` after the configured delay
    ScheduleReply { chat_id: ChatId, user_text: String },

    /// Append straight into the view, bypassing the store
    AppendToView { message: Message },

    /// Show a message just appended to `chat_id`, below what is on screen
    AppendReply { chat_id: ChatId, message: Message },

    RenderModelInfo { model: ModelChoice },
    RenderThinking { enabled: bool },

    /// Drop the persisted tour completion so the tour runs again next time
    ForgetTourCompleted,

    Tour(TourEffect),
}

impl From<TourEffect> for Effect {
    fn from(effect: TourEffect) -> Self {
        Effect::Tour(effect)
    }
}
