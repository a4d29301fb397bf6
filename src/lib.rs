//! RecessionAlert chat widget
//!
//! An embeddable chat assistant: a sidebar of conversations, a message
//! area fed by a canned keyword responder, and a first-run guided tour
//! whose completion is remembered per origin.
//!
//! The host supplies a [`widget::ViewRenderer`] for its page, a
//! [`widget::FlagStore`] for durable flags and optionally an
//! [`widget::InputSource`] for user actions; [`widget::ChatWidget`] wires
//! them to the runtime.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod config;
pub mod db;
pub mod model;
pub mod responder;
pub mod store;
pub mod terminal;
pub mod tour;
pub mod widget;

pub use config::WidgetConfig;
pub use db::Database;
pub use model::{Attachment, AttachmentKind, ChatId, ChatSession, Message, ModelChoice, Role};
pub use responder::{KeywordResponder, ReplySource};
pub use widget::{ChatWidget, UserAction, WidgetHandle};
