//! Delayed reply delivery
//!
//! One background task serves every chat of a widget. Requests are handled
//! strictly in the order they were scheduled, so replies re-enter the event
//! queue in that same order.

use super::Event;
use crate::model::ChatId;
use crate::responder::ReplySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct PendingReply {
    chat_id: ChatId,
    user_text: String,
    due: Instant,
}

/// Handle used by the runtime to schedule replies
#[derive(Debug, Clone)]
pub struct ReplyScheduler {
    tx: mpsc::UnboundedSender<PendingReply>,
    delay: Duration,
}

impl ReplyScheduler {
    /// Spawn the delivery task. It stops when `cancel` fires or when the
    /// runtime's event channel closes.
    pub fn spawn<S: ReplySource + 'static>(
        source: Arc<S>,
        delay: Duration,
        event_tx: mpsc::Sender<Event>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(deliver_replies(source, rx, event_tx, cancel));
        Self { tx, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue a reply for `chat_id`; returns false if the delivery task has
    /// already stopped
    pub fn schedule(&self, chat_id: ChatId, user_text: String) -> bool {
        let due = Instant::now() + self.delay;
        self.tx
            .send(PendingReply {
                chat_id,
                user_text,
                due,
            })
            .is_ok()
    }
}

async fn deliver_replies<S: ReplySource>(
    source: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<PendingReply>,
    event_tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    loop {
        let pending = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(p) => p,
                None => break,
            },
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep_until(pending.due) => {}
        }

        let reply = source.reply(&pending.user_text).await;
        tracing::debug!(chat_id = %pending.chat_id, "Reply ready");

        let event = Event::ReplyReady {
            chat_id: pending.chat_id,
            reply,
        };
        if event_tx.send(event).await.is_err() {
            break;
        }
    }

    let dropped = rx.len();
    if dropped > 0 {
        tracing::info!(dropped, "Reply scheduler stopped with replies pending");
    } else {
        tracing::debug!("Reply scheduler stopped");
    }
}
