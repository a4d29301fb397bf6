//! Effects produced by tour transitions

use super::steps::{TargetRef, TourStepDefinition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEffect {
    /// Remove every highlight and step box currently shown
    ClearDecorations,
    /// Highlight a view region; resolved by the renderer at execution time
    Highlight { target: TargetRef },
    /// Show the explanatory box for a step
    ShowStepBox {
        step: &'static TourStepDefinition,
        is_last: bool,
    },
    /// Write the completion flag (safe to repeat)
    PersistCompleted,
}
