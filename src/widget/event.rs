//! Events processed by the widget runtime

use crate::model::{ChatId, ChatSession, ModelChoice, Role};
use crate::responder::Reply;
use tokio::sync::oneshot;

/// Actions delivered by an input source (clicks, key presses)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Text typed into the input and submitted
    SendMessage { text: String },
    /// Starter prompt picked on the welcome screen
    PromptSelected { text: String },
    /// "New chat" button: back to the welcome screen
    NewChat,
    SelectChat { id: ChatId },
    RenameChat { id: ChatId, title: String },
    SelectModel { model: ModelChoice },
    ToggleThinking,
    TourNext,
    TourSkip,
    /// Run the tour again from the first step
    ReplayTour,
}

/// Events that trigger state changes
#[derive(Debug)]
pub enum Event {
    Action(UserAction),

    /// Out-of-band message from the host; shown but not stored
    HostMessage { role: Role, text: String },

    /// First run detected at mount
    StartTour,

    /// A scheduled reply finished its delay
    ReplyReady { chat_id: ChatId, reply: Reply },

    /// Copy of every chat, in creation order
    Snapshot {
        respond: oneshot::Sender<Vec<ChatSession>>,
    },
}

impl From<UserAction> for Event {
    fn from(action: UserAction) -> Self {
        Event::Action(action)
    }
}
