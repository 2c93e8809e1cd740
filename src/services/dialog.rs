//! Slot-filling booking dialog.
//!
//! The dialog is a pure transition function over [`DialogState`]: the host
//! calls [`begin`] once with whatever the recognizer pre-filled, persists the
//! returned state, and calls [`resume`] with each following reply until the
//! dialog completes. A slot that already holds a value is never asked for.

use crate::models::dialog::{confirmation_text, CONFIRM_RETRY_SUFFIX};
use crate::models::{BookingDetails, DialogState, DialogStep, Prompt};

#[derive(Debug, Clone, PartialEq)]
pub enum DialogTurn {
    /// Suspend until the next reply. `state` must be persisted by the host.
    Prompt { state: DialogState, prompt: Prompt },
    /// The dialog ended. `None` means the user declined the booking.
    Complete(Option<BookingDetails>),
}

pub fn begin(booking: BookingDetails) -> DialogTurn {
    next_missing_slot(booking)
}

pub fn resume(state: DialogState, reply: &str) -> DialogTurn {
    let DialogState { step, mut booking } = state;
    let answer = reply.trim();

    match step {
        DialogStep::Destination => {
            if answer.is_empty() {
                return reprompt(DialogState { step, booking });
            }
            booking.destination = Some(answer.to_string());
            next_missing_slot(booking)
        }
        DialogStep::Origin => {
            if answer.is_empty() {
                return reprompt(DialogState { step, booking });
            }
            booking.origin = Some(answer.to_string());
            next_missing_slot(booking)
        }
        DialogStep::Confirm => match parse_confirmation(answer) {
            Some(true) => DialogTurn::Complete(Some(booking)),
            Some(false) => DialogTurn::Complete(None),
            None => {
                let retry = format!("{}{}", confirmation_text(&booking), CONFIRM_RETRY_SUFFIX);
                DialogTurn::Prompt {
                    state: DialogState { step, booking },
                    prompt: Prompt::Confirm(retry),
                }
            }
        },
    }
}

fn next_missing_slot(booking: BookingDetails) -> DialogTurn {
    let step = if !booking.has_destination() {
        DialogStep::Destination
    } else if !booking.has_origin() {
        DialogStep::Origin
    } else {
        DialogStep::Confirm
    };

    reprompt(DialogState { step, booking })
}

fn reprompt(state: DialogState) -> DialogTurn {
    let prompt = state.current_prompt();
    DialogTurn::Prompt { state, prompt }
}

/// Interprets a free-text reply to a yes/no prompt. Returns `None` when the
/// reply is neither.
pub fn parse_confirmation(reply: &str) -> Option<bool> {
    let normalized = reply
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase();

    match normalized.as_str() {
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" | "correct" | "right" | "true"
        | "1" => Some(true),
        "no" | "n" | "nope" | "nah" | "wrong" | "incorrect" | "false" | "2" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dialog::{DESTINATION_PROMPT, ORIGIN_PROMPT};

    fn details(destination: Option<&str>, origin: Option<&str>) -> BookingDetails {
        BookingDetails {
            destination: destination.map(str::to_string),
            origin: origin.map(str::to_string),
            travel_date: None,
        }
    }

    fn expect_prompt(turn: DialogTurn) -> (DialogState, Prompt) {
        match turn {
            DialogTurn::Prompt { state, prompt } => (state, prompt),
            DialogTurn::Complete(result) => panic!("expected a prompt, dialog completed with {result:?}"),
        }
    }

    #[test]
    fn test_prefilled_slots_go_straight_to_confirmation() {
        let (state, prompt) = expect_prompt(begin(details(Some("Paris"), Some("Seattle"))));
        assert_eq!(state.step, DialogStep::Confirm);
        assert_eq!(
            prompt,
            Prompt::Confirm(
                "Please confirm, I have you traveling to: Paris from: Seattle. Is this correct?"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_missing_destination_asks_once() {
        let (state, prompt) = expect_prompt(begin(details(None, Some("Seattle"))));
        assert_eq!(prompt, Prompt::Text(DESTINATION_PROMPT.to_string()));

        let (state, prompt) = expect_prompt(resume(state, "Berlin"));
        assert_eq!(state.step, DialogStep::Confirm);
        assert!(matches!(prompt, Prompt::Confirm(_)));
        assert_eq!(state.booking.destination.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_empty_string_slot_is_asked_for() {
        let (state, prompt) = expect_prompt(begin(details(Some(""), Some(""))));
        assert_eq!(state.step, DialogStep::Destination);
        assert_eq!(prompt.text(), DESTINATION_PROMPT);
    }

    #[test]
    fn test_full_flow_binds_replies_on_yes() {
        let (state, _) = expect_prompt(begin(BookingDetails::default()));
        let (state, prompt) = expect_prompt(resume(state, "Paris"));
        assert_eq!(prompt, Prompt::Text(ORIGIN_PROMPT.to_string()));
        let (state, prompt) = expect_prompt(resume(state, "London"));
        assert_eq!(
            prompt.text(),
            "Please confirm, I have you traveling to: Paris from: London. Is this correct?"
        );

        match resume(state, "yes") {
            DialogTurn::Complete(Some(booking)) => {
                assert_eq!(booking, details(Some("Paris"), Some("London")));
            }
            other => panic!("unexpected turn: {other:?}"),
        }
    }

    #[test]
    fn test_declined_confirmation_yields_no_result() {
        let (state, _) = expect_prompt(begin(details(Some("Paris"), Some("London"))));
        assert_eq!(resume(state, "No."), DialogTurn::Complete(None));
    }

    #[test]
    fn test_unclear_confirmation_reprompts_with_choices() {
        let (state, _) = expect_prompt(begin(details(Some("Paris"), Some("London"))));
        let (state, prompt) = expect_prompt(resume(state.clone(), "maybe later"));
        assert_eq!(state.step, DialogStep::Confirm);
        assert!(prompt.text().ends_with("Is this correct? (1) Yes or (2) No"));

        assert!(matches!(resume(state, "1"), DialogTurn::Complete(Some(_))));
    }

    #[test]
    fn test_blank_reply_reprompts_same_slot() {
        let (state, _) = expect_prompt(begin(BookingDetails::default()));
        let (state, prompt) = expect_prompt(resume(state, "   "));
        assert_eq!(state.step, DialogStep::Destination);
        assert_eq!(prompt.text(), DESTINATION_PROMPT);
        assert_eq!(state.booking.destination, None);
    }

    #[test]
    fn test_confirmation_text_embeds_bound_values() {
        let (state, _) = expect_prompt(begin(details(None, None)));
        let (state, _) = expect_prompt(resume(state, "New York"));
        let (_, prompt) = expect_prompt(resume(state, "San Francisco"));

        let text = prompt.text();
        let destination = text
            .split("traveling to: ")
            .nth(1)
            .and_then(|rest| rest.split(" from: ").next());
        let origin = text
            .split(" from: ")
            .nth(1)
            .and_then(|rest| rest.strip_suffix(". Is this correct?"));
        assert_eq!(destination, Some("New York"));
        assert_eq!(origin, Some("San Francisco"));
    }

    #[test]
    fn test_state_survives_serialization_between_turns() {
        let (state, _) = expect_prompt(begin(details(Some("Rome"), None)));
        let json = serde_json::to_string(&state).unwrap();
        let restored: DialogState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let (state, _) = expect_prompt(resume(restored, "Oslo"));
        assert_eq!(state.booking.origin.as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("Yes!"), Some(true));
        assert_eq!(parse_confirmation(" okay "), Some(true));
        assert_eq!(parse_confirmation("NOPE"), Some(false));
        assert_eq!(parse_confirmation("2"), Some(false));
        assert_eq!(parse_confirmation("what?"), None);
    }
}
