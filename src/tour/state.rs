//! Tour state

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourState {
    /// Tour never entered (flag present, or not started yet)
    #[default]
    NotStarted,
    /// Showing the step at `index`
    Step { index: usize },
    /// Terminal; decorations removed and completion persisted
    Ended,
}

impl TourState {
    pub fn is_active(&self) -> bool {
        matches!(self, TourState::Step { .. })
    }

    /// Current step index, only meaningful while active
    pub fn step(&self) -> Option<usize> {
        match self {
            TourState::Step { index } => Some(*index),
            _ => None,
        }
    }
}
