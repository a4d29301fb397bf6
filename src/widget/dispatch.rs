//! Event handling: mutate widget state, return effects
//!
//! Nothing in here touches the view or the flag store. Every state change
//! happens synchronously inside one call, and the returned effects describe
//! what the runtime has to reflect afterwards.

use super::{Effect, Event, UserAction, WidgetError};
use crate::model::{ChatId, Message, ModelChoice};
use crate::responder::Reply;
use crate::store::SessionStore;
use crate::tour::{TourController, TourEvent};
use std::collections::HashSet;

/// Everything the widget knows, owned by a single runtime
#[derive(Debug, Default)]
pub struct WidgetState {
    pub store: SessionStore,
    pub tour: TourController,
    /// Chats with a reply scheduled but not delivered yet
    pub pending: HashSet<ChatId>,
    pub model: ModelChoice,
    pub thinking: bool,
}

impl WidgetState {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Whether the chat on screen is waiting for a reply
    pub fn active_is_pending(&self) -> bool {
        self.store
            .active_chat_id()
            .is_some_and(|id| self.pending.contains(id))
    }

    /// Effects that redraw the chat area for the current selection
    fn show_active(&self) -> Vec<Effect> {
        let typing = if self.active_is_pending() {
            Effect::ShowTypingIndicator
        } else {
            Effect::HideTypingIndicator
        };
        vec![
            Effect::RenderSidebar,
            Effect::RenderMessages,
            Effect::ClearInput,
            typing,
        ]
    }
}

/// Apply one event to the state.
///
/// On error the state is unchanged and no effects should run.
pub fn handle_event(state: &mut WidgetState, event: Event) -> Result<Vec<Effect>, WidgetError> {
    match event {
        Event::Action(action) => handle_action(state, action),

        Event::HostMessage { role, text } => Ok(vec![Effect::AppendToView {
            message: Message {
                role,
                text,
                attachments: vec![],
            },
        }]),

        Event::StartTour => tour_effects(state, TourEvent::Start),

        Event::ReplyReady { chat_id, reply } => deliver_reply(state, &chat_id, reply),

        // Answered by the runtime, which owns the response channel
        Event::Snapshot { .. } => Ok(vec![]),
    }
}

fn handle_action(state: &mut WidgetState, action: UserAction) -> Result<Vec<Effect>, WidgetError> {
    match action {
        UserAction::SendMessage { text } => send_user_message(state, &text),

        UserAction::PromptSelected { text } => {
            if text.trim().is_empty() {
                return Ok(vec![]);
            }
            state.store.create_chat(Some(&text));
            send_user_message(state, &text)
        }

        UserAction::NewChat => {
            state.store.clear_active_selection();
            Ok(vec![
                Effect::RenderSidebar,
                Effect::RenderMessages,
                Effect::HideTypingIndicator,
            ])
        }

        UserAction::SelectChat { id } => {
            state.store.select_chat(&id)?;
            Ok(state.show_active())
        }

        UserAction::RenameChat { id, title } => {
            if state.store.rename_chat(&id, &title)? {
                Ok(vec![Effect::RenderSidebar])
            } else {
                tracing::debug!(chat_id = %id, "Ignoring blank rename");
                Ok(vec![])
            }
        }

        UserAction::SelectModel { model } => {
            state.model = model;
            Ok(vec![Effect::RenderModelInfo { model }])
        }

        UserAction::ToggleThinking => {
            state.thinking = !state.thinking;
            tracing::info!(enabled = state.thinking, "Extended thinking toggled");
            Ok(vec![Effect::RenderThinking {
                enabled: state.thinking,
            }])
        }

        UserAction::TourNext => tour_effects(state, TourEvent::Next),
        UserAction::TourSkip => tour_effects(state, TourEvent::Skip),

        UserAction::ReplayTour => {
            let tour = state.tour.replay()?;
            let mut effects = vec![Effect::ForgetTourCompleted];
            effects.extend(tour.into_iter().map(Effect::from));
            Ok(effects)
        }
    }
}

/// Append the user's message now and schedule the bot reply.
///
/// Opens a new chat titled after the message when none is active. Sending
/// to a chat that is still waiting for its previous reply is rejected.
fn send_user_message(state: &mut WidgetState, text: &str) -> Result<Vec<Effect>, WidgetError> {
    let text = text.trim();
    if text.is_empty() {
        tracing::debug!("Ignoring empty message");
        return Ok(vec![]);
    }

    let chat_id = match state.store.active_chat_id() {
        Some(id) => id.clone(),
        None => state.store.create_chat(Some(text)),
    };

    if state.pending.contains(&chat_id) {
        return Err(WidgetError::ReplyPending(chat_id));
    }

    state.store.append_message(&chat_id, Message::user(text))?;
    state.pending.insert(chat_id.clone());

    Ok(vec![
        Effect::RenderSidebar,
        Effect::RenderMessages,
        Effect::ClearInput,
        Effect::ShowTypingIndicator,
        Effect::ScheduleReply {
            chat_id,
            user_text: text.to_string(),
        },
    ])
}

/// Append a finished reply to the chat it was scheduled for, which may no
/// longer be the active one. An active chat gets the reply appended below
/// whatever is on screen rather than redrawn.
fn deliver_reply(
    state: &mut WidgetState,
    chat_id: &ChatId,
    reply: Reply,
) -> Result<Vec<Effect>, WidgetError> {
    let message = reply.into_message();
    state.store.append_message(chat_id, message.clone())?;
    state.pending.remove(chat_id);

    if state.store.active_chat_id() == Some(chat_id) {
        Ok(vec![
            Effect::HideTypingIndicator,
            Effect::AppendReply {
                chat_id: chat_id.clone(),
                message,
            },
        ])
    } else {
        tracing::debug!(chat_id = %chat_id, "Reply delivered to background chat");
        Ok(vec![])
    }
}

fn tour_effects(state: &mut WidgetState, event: TourEvent) -> Result<Vec<Effect>, WidgetError> {
    let effects = state.tour.apply(event)?;
    Ok(effects.into_iter().map(Effect::from).collect())
}
