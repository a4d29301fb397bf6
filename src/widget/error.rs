//! Widget error types

use crate::db::DbError;
use crate::model::ChatId;
use crate::store::StoreError;
use crate::tour::TourError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    /// Configured mount point does not exist in the host page
    #[error("Container #{0} not found")]
    MountPointMissing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Tour(#[from] TourError),
    #[error(transparent)]
    Db(#[from] DbError),
    /// A reply for this chat has not been delivered yet
    #[error("Reply still pending for chat {0}")]
    ReplyPending(ChatId),
    #[error("Widget is not running")]
    NotRunning,
    #[error("init called outside a Tokio runtime")]
    NoRuntime,
}

impl WidgetError {
    /// Errors caused by rapid or out-of-sequence clicks rather than a fault
    pub fn is_user_facing(&self) -> bool {
        matches!(self, WidgetError::ReplyPending(_) | WidgetError::Tour(_))
    }
}
