//! Inputs that drive the tour

/// Events that trigger tour transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    /// First run detected at init
    Start,
    /// "Next" (or "Finish" on the last step) pressed
    Next,
    /// "Skip" pressed
    Skip,
}
