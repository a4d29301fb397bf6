//! Chat widget facade and runtime
//!
//! [`ChatWidget`] is what a host embeds: `init` mounts the widget and starts
//! its runtime, `add_message` injects a message into the view. Nothing here
//! returns an error to the host; failures are logged.

mod dispatch;
mod effect;
mod error;
pub mod event;
mod executor;
mod scheduler;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use dispatch::{handle_event, WidgetState};
pub use effect::Effect;
pub use error::WidgetError;
pub use event::{Event, UserAction};
pub use executor::WidgetRuntime;
pub use scheduler::ReplyScheduler;
pub use traits::*;

use crate::config::WidgetConfig;
use crate::model::{ChatSession, Role};
use crate::responder::ReplySource;
use crate::store::SessionStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const EVENT_QUEUE_SIZE: usize = 64;

/// Collaborators held until a successful `init` hands them to the runtime
struct Parts<R, F, S> {
    renderer: R,
    flags: F,
    replies: Arc<S>,
    store: SessionStore,
}

/// Cloneable sender into a running widget's event queue
#[derive(Clone)]
pub struct WidgetHandle {
    event_tx: mpsc::Sender<Event>,
}

impl WidgetHandle {
    pub(crate) fn from_sender(event_tx: mpsc::Sender<Event>) -> Self {
        Self { event_tx }
    }

    /// Queue a user action, waiting for room in the queue
    pub async fn dispatch(&self, action: UserAction) -> Result<(), WidgetError> {
        self.event_tx
            .send(Event::Action(action))
            .await
            .map_err(|_| WidgetError::NotRunning)
    }

    /// Copy of every chat once all previously queued events are handled
    pub async fn chats(&self) -> Result<Vec<ChatSession>, WidgetError> {
        let (respond, rx) = oneshot::channel();
        self.event_tx
            .send(Event::Snapshot { respond })
            .await
            .map_err(|_| WidgetError::NotRunning)?;
        rx.await.map_err(|_| WidgetError::NotRunning)
    }

    /// Forward every action from `source` until it is exhausted or the
    /// widget stops
    pub fn attach_input<I: InputSource>(&self, mut source: I) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            while let Some(action) = source.next_action().await {
                if handle.dispatch(action).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Input source finished");
        })
    }
}

/// An embeddable chat widget instance.
///
/// Every instance owns its own state, so several widgets can live side by
/// side. `init` must be called from within a Tokio runtime.
pub struct ChatWidget<R, F, S>
where
    R: ViewRenderer,
    F: FlagStore,
    S: ReplySource + 'static,
{
    instance_id: Uuid,
    parts: Option<Parts<R, F, S>>,
    handle: Option<WidgetHandle>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<R, F, S> ChatWidget<R, F, S>
where
    R: ViewRenderer,
    F: FlagStore,
    S: ReplySource + 'static,
{
    /// Widget starting from the demo conversations
    pub fn new(renderer: R, flags: F, replies: S) -> Self {
        Self::with_store(renderer, flags, replies, SessionStore::seeded())
    }

    pub fn with_store(renderer: R, flags: F, replies: S, store: SessionStore) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            parts: Some(Parts {
                renderer,
                flags,
                replies: Arc::new(replies),
                store,
            }),
            handle: None,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Mount into `config.container_id` and start the runtime.
    ///
    /// A missing mount point, or no Tokio runtime to spawn on, is logged and
    /// leaves the widget untouched, so calling `init` again later is safe.
    pub fn init(&mut self, config: WidgetConfig) {
        if let Err(e) = self.try_init(config) {
            tracing::error!(instance = %self.instance_id, error = %e, "Chat widget init failed");
        }
    }

    fn try_init(&mut self, config: WidgetConfig) -> Result<(), WidgetError> {
        let Some(parts) = self.parts.as_ref() else {
            tracing::warn!(instance = %self.instance_id, "Chat widget already initialized");
            return Ok(());
        };
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(WidgetError::NoRuntime);
        }
        if !parts.renderer.has_mount_point(&config.container_id) {
            return Err(WidgetError::MountPointMissing(config.container_id));
        }
        let Some(parts) = self.parts.take() else {
            return Ok(());
        };

        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_SIZE);
        let scheduler = ReplyScheduler::spawn(
            parts.replies,
            config.reply_delay,
            event_tx.clone(),
            self.cancel.clone(),
        );

        let mut runtime = WidgetRuntime::new(
            self.instance_id,
            config,
            WidgetState::new(parts.store),
            parts.renderer,
            parts.flags,
            scheduler,
            event_rx,
            self.cancel.clone(),
        );

        let start_tour = match runtime.mount() {
            Ok(start) => start,
            Err(e) => {
                // Unreadable flag: skip the tour rather than the widget
                tracing::error!(error = %e, "Failed to read tour flag");
                false
            }
        };
        if start_tour {
            tracing::info!(instance = %self.instance_id, "First run, starting tour");
            runtime.process_event(Event::StartTour);
        }

        self.task = Some(tokio::spawn(runtime.run()));
        self.handle = Some(WidgetHandle::from_sender(event_tx));
        Ok(())
    }

    /// Whether `init` has succeeded
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<WidgetHandle> {
        self.handle.clone()
    }

    /// Show a message in the current view without storing it in any chat
    pub fn add_message(&self, role: Role, text: impl Into<String>) {
        let Some(handle) = &self.handle else {
            tracing::warn!(instance = %self.instance_id, "add_message before init, ignoring");
            return;
        };
        let event = Event::HostMessage {
            role,
            text: text.into(),
        };
        if let Err(e) = handle.event_tx.try_send(event) {
            tracing::warn!(instance = %self.instance_id, error = %e, "Dropping host message");
        }
    }

    /// Stop the runtime; pending replies are dropped
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        self.handle = None;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<R, F, S> Drop for ChatWidget<R, F, S>
where
    R: ViewRenderer,
    F: FlagStore,
    S: ReplySource + 'static,
{
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
