//! Widget runtime executor
//!
//! Drains the event queue one event at a time: the state is updated by
//! [`handle_event`] and the resulting effects are applied to the view, the
//! flag store and the reply scheduler.

use super::dispatch::{handle_event, WidgetState};
use super::scheduler::ReplyScheduler;
use super::traits::{FlagStore, ViewRenderer};
use super::{Effect, Event, WidgetError};
use crate::config::WidgetConfig;
use crate::store::STARTER_PROMPTS;
use crate::tour::{TourEffect, TOUR_COMPLETED_KEY};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Generic runtime that works with any renderer and flag store
pub struct WidgetRuntime<R, F>
where
    R: ViewRenderer,
    F: FlagStore,
{
    instance_id: Uuid,
    config: WidgetConfig,
    state: WidgetState,
    renderer: R,
    flags: F,
    scheduler: ReplyScheduler,
    event_rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
}

impl<R, F> WidgetRuntime<R, F>
where
    R: ViewRenderer,
    F: FlagStore,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instance_id: Uuid,
        config: WidgetConfig,
        state: WidgetState,
        renderer: R,
        flags: F,
        scheduler: ReplyScheduler,
        event_rx: mpsc::Receiver<Event>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            instance_id,
            config,
            state,
            renderer,
            flags,
            scheduler,
            event_rx,
            cancel,
        }
    }

    /// Build the interface into the mount point and show the welcome screen.
    /// Returns whether the tour should start.
    pub fn mount(&mut self) -> Result<bool, WidgetError> {
        tracing::info!(
            instance = %self.instance_id,
            container = %self.config.container_id,
            "Initializing chat widget"
        );
        self.renderer.build_interface(&self.config.container_id);
        self.renderer.render_model_info(self.state.model);
        self.state.store.clear_active_selection();
        self.execute_effect(Effect::RenderSidebar);
        self.execute_effect(Effect::RenderMessages);

        let completed = self
            .flags
            .get_flag(&self.config.origin, TOUR_COMPLETED_KEY)?
            .is_some();
        Ok(!completed)
    }

    pub async fn run(mut self) {
        tracing::info!(instance = %self.instance_id, "Starting widget runtime");

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
            }
        }

        // Stop the scheduler too if the queue closed on its own
        self.cancel.cancel();
        tracing::info!(instance = %self.instance_id, "Widget runtime stopped");
    }

    pub fn process_event(&mut self, event: Event) {
        if let Event::Snapshot { respond } = event {
            let chats = self.state.store.chats().cloned().collect();
            let _ = respond.send(chats);
            return;
        }

        match handle_event(&mut self.state, event) {
            Ok(effects) => {
                for effect in effects {
                    self.execute_effect(effect);
                }
            }
            Err(e) if e.is_user_facing() => {
                tracing::warn!(instance = %self.instance_id, error = %e, "Action rejected");
            }
            Err(e) => {
                tracing::error!(instance = %self.instance_id, error = %e, "Error handling event");
            }
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RenderSidebar => {
                let rows = self.state.store.summaries();
                self.renderer.render_sidebar(&rows);
            }

            Effect::RenderMessages => match self.state.store.active_chat() {
                Some(chat) => self.renderer.render_messages(chat),
                None => self.renderer.render_welcome(&STARTER_PROMPTS),
            },

            Effect::ShowTypingIndicator => self.renderer.show_typing_indicator(),
            Effect::HideTypingIndicator => self.renderer.hide_typing_indicator(),
            Effect::ClearInput => self.renderer.clear_input(),

            Effect::ScheduleReply { chat_id, user_text } => {
                tracing::debug!(
                    chat_id = %chat_id,
                    delay_ms = %self.scheduler.delay().as_millis(),
                    "Scheduling reply"
                );
                if !self.scheduler.schedule(chat_id.clone(), user_text) {
                    // Only happens while shutting down
                    tracing::warn!(chat_id = %chat_id, "Reply scheduler is gone");
                    self.state.pending.remove(&chat_id);
                }
            }

            Effect::AppendToView { message } => self.renderer.append_message(&message),
            Effect::AppendReply { chat_id, message } => {
                self.renderer.append_chat_message(&chat_id, &message);
            }

            Effect::RenderModelInfo { model } => self.renderer.render_model_info(model),
            Effect::RenderThinking { enabled } => self.renderer.render_thinking(enabled),

            Effect::ForgetTourCompleted => {
                match self.flags.clear_flag(&self.config.origin, TOUR_COMPLETED_KEY) {
                    Ok(()) => tracing::info!(instance = %self.instance_id, "Replaying tour"),
                    Err(e) => tracing::error!(error = %e, "Failed to clear tour completion"),
                }
            }

            Effect::Tour(tour) => self.execute_tour_effect(tour),
        }
    }

    fn execute_tour_effect(&mut self, effect: TourEffect) {
        match effect {
            TourEffect::ClearDecorations => self.renderer.clear_tour_decorations(),
            TourEffect::Highlight { target } => self.renderer.highlight(target),
            TourEffect::ShowStepBox { step, is_last } => {
                self.renderer.show_step_box(step, is_last);
            }
            TourEffect::PersistCompleted => {
                match self
                    .flags
                    .set_flag(&self.config.origin, TOUR_COMPLETED_KEY, "true")
                {
                    Ok(()) => tracing::info!(instance = %self.instance_id, "Tour completed"),
                    Err(e) => tracing::error!(error = %e, "Failed to persist tour completion"),
                }
            }
        }
    }
}
