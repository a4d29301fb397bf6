//! Stateful wrapper around the pure tour transition

use super::{transition, TourEffect, TourError, TourEvent, TourState};

/// Holds the current tour state and applies events to it
#[derive(Debug, Default)]
pub struct TourController {
    state: TourState,
}

impl TourController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    /// Apply an event, returning the effects to execute. On error the state
    /// is left unchanged.
    pub fn apply(&mut self, event: TourEvent) -> Result<Vec<TourEffect>, TourError> {
        let result = transition(&self.state, event)?;
        if result.new_state != self.state {
            tracing::info!(from = ?self.state, to = ?result.new_state, "Tour transition");
        }
        self.state = result.new_state;
        Ok(result.effects)
    }

    pub fn start(&mut self) -> Result<Vec<TourEffect>, TourError> {
        self.apply(TourEvent::Start)
    }

    pub fn next(&mut self) -> Result<Vec<TourEffect>, TourError> {
        self.apply(TourEvent::Next)
    }

    pub fn skip(&mut self) -> Result<Vec<TourEffect>, TourError> {
        self.apply(TourEvent::Skip)
    }

    /// Start over from the first step once the tour is not running
    pub fn replay(&mut self) -> Result<Vec<TourEffect>, TourError> {
        if self.state.is_active() {
            return Err(TourError::AlreadyStarted);
        }
        self.state = TourState::NotStarted;
        self.start()
    }
}
