use serde::{Deserialize, Serialize};

use super::BookingDetails;

pub const DESTINATION_PROMPT: &str = "Where would you like to travel to?";
pub const ORIGIN_PROMPT: &str = "Where are you traveling from?";
pub const CONFIRM_RETRY_SUFFIX: &str = " (1) Yes or (2) No";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DialogStep {
    Destination,
    Origin,
    Confirm,
}

impl DialogStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogStep::Destination => "destination",
            DialogStep::Origin => "origin",
            DialogStep::Confirm => "confirm",
        }
    }
}

/// Everything the host needs to persist between turns: where the dialog is
/// suspended and the booking collected so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogState {
    pub step: DialogStep,
    pub booking: BookingDetails,
}

impl DialogState {
    /// The prompt the dialog is waiting on at this step.
    pub fn current_prompt(&self) -> Prompt {
        match self.step {
            DialogStep::Destination => Prompt::Text(DESTINATION_PROMPT.to_string()),
            DialogStep::Origin => Prompt::Text(ORIGIN_PROMPT.to_string()),
            DialogStep::Confirm => Prompt::Confirm(confirmation_text(&self.booking)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Free-text answer expected.
    Text(String),
    /// Yes/no answer expected.
    Confirm(String),
}

impl Prompt {
    pub fn text(&self) -> &str {
        match self {
            Prompt::Text(t) | Prompt::Confirm(t) => t,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Prompt::Text(_) => "text",
            Prompt::Confirm(_) => "confirm",
        }
    }
}

pub fn confirmation_text(booking: &BookingDetails) -> String {
    format!(
        "Please confirm, I have you traveling to: {} from: {}. Is this correct?",
        booking.destination_text(),
        booking.origin_text(),
    )
}
