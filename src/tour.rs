//! Onboarding tour state machine
//!
//! A strictly forward sequence of steps with an early exit from every step.
//! Transitions are pure; the widget runtime executes the effects.

mod controller;
mod effect;
pub mod event;
pub mod state;
mod steps;
pub(crate) mod transition;


pub use controller::TourController;
pub use effect::TourEffect;
pub use event::TourEvent;
pub use state::TourState;
pub use steps::{
    step_definition, Anchor, TargetRef, TourStepDefinition, LAST_STEP, STEP_COUNT, TOUR_STEPS,
};
pub use transition::{transition, TourError, TourTransition};

/// Key of the persisted flag that suppresses the tour once it has ended
pub const TOUR_COMPLETED_KEY: &str = "ra-chat-tour-completed";
