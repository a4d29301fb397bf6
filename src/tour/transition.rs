//! Pure tour transition function

use super::steps::{step_definition, LAST_STEP};
use super::{TourEffect, TourEvent, TourState};
use thiserror::Error;

/// Result of a tour transition
#[derive(Debug)]
pub struct TourTransition {
    pub new_state: TourState,
    pub effects: Vec<TourEffect>,
}

impl TourTransition {
    pub fn new(state: TourState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: TourEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = TourEffect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TourError {
    #[error("Tour has not been started")]
    NotStarted,
    #[error("Tour was already started")]
    AlreadyStarted,
}

/// Pure transition function: no I/O, same inputs give the same outputs.
pub fn transition(state: &TourState, event: TourEvent) -> Result<TourTransition, TourError> {
    match (state, event) {
        (TourState::NotStarted, TourEvent::Start) => Ok(enter_step(0)),

        (TourState::Step { .. } | TourState::Ended, TourEvent::Start) => {
            Err(TourError::AlreadyStarted)
        }

        (TourState::Step { index }, TourEvent::Next) if *index < LAST_STEP => {
            Ok(enter_step(index + 1))
        }

        // Finish on the last step, skip anywhere, and repeated termination
        // all land in Ended with the same effects
        (TourState::Step { .. }, TourEvent::Next | TourEvent::Skip)
        | (TourState::Ended, TourEvent::Next | TourEvent::Skip) => Ok(enter_ended()),

        (TourState::NotStarted, TourEvent::Next | TourEvent::Skip) => Err(TourError::NotStarted),
    }
}

fn enter_step(index: usize) -> TourTransition {
    let mut result =
        TourTransition::new(TourState::Step { index }).with_effect(TourEffect::ClearDecorations);

    // Indices only come from 0 and `index + 1` with `index < LAST_STEP`
    if let Some(step) = step_definition(index) {
        if let Some(target) = step.target {
            result = result.with_effect(TourEffect::Highlight { target });
        }
        result = result.with_effect(TourEffect::ShowStepBox {
            step,
            is_last: index == LAST_STEP,
        });
    }
    result
}

fn enter_ended() -> TourTransition {
    TourTransition::new(TourState::Ended)
        .with_effects([TourEffect::ClearDecorations, TourEffect::PersistCompleted])
}
