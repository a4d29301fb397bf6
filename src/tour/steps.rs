//! Static tour step definitions

/// View region a tour step points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRef {
    /// Chat history list and model selector
    Sidebar,
    /// Message input row
    InputArea,
}

/// Screen placement of a step box, as CSS-like offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub top: Option<&'static str>,
    pub left: Option<&'static str>,
    pub bottom: Option<&'static str>,
    pub transform: Option<&'static str>,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        top: Some("50%"),
        left: Some("50%"),
        bottom: None,
        transform: Some("translate(-50%, -50%)"),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourStepDefinition {
    /// `None` for steps that are not attached to a region
    pub target: Option<TargetRef>,
    pub title: &'static str,
    pub text: &'static str,
    pub anchor: Anchor,
}

/// Number of interactive steps
pub const STEP_COUNT: usize = 3;

pub static TOUR_STEPS: [TourStepDefinition; STEP_COUNT] = [
    TourStepDefinition {
        target: None,
        title: "Welcome to RecessionAlert AI",
        text: "Your new assistant for market analysis and economic forecasting. \
               Let's take a quick tour.",
        anchor: Anchor::CENTER,
    },
    TourStepDefinition {
        target: Some(TargetRef::Sidebar),
        title: "Chat History & Models",
        text: "Access your past conversations here. You can also switch between AI models \
               (GPT or Gemini) using the selector at the bottom.",
        anchor: Anchor {
            top: Some("50px"),
            left: Some("270px"),
            bottom: None,
            transform: Some("none"),
        },
    },
    TourStepDefinition {
        target: Some(TargetRef::InputArea),
        title: "Ask Questions",
        text: "Type your queries here. Use the \"Thinking\" menu for advanced options or \
               simply press Enter to send.",
        anchor: Anchor {
            top: Some("auto"),
            left: Some("50%"),
            bottom: Some("100px"),
            transform: Some("translateX(-50%)"),
        },
    },
];

/// Index of the final interactive step
pub const LAST_STEP: usize = STEP_COUNT - 1;

pub fn step_definition(index: usize) -> Option<&'static TourStepDefinition> {
    TOUR_STEPS.get(index)
}
