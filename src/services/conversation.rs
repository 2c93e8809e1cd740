use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::db::queries;
use crate::models::{BookingDetails, BookingRecord, Conversation, UserProfile};
use crate::services::dialog::{self, DialogTurn};
use crate::services::recognizer::{extract_destination, extract_direction, extract_origin};
use crate::state::AppState;

pub const HELP_TEXT: &str = "Show help here";
pub const CANCEL_TEXT: &str = "Cancelling...";
pub const FOLLOW_UP_TEXT: &str = "What else can I do for you?";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Prompting,
    Booked,
    Declined,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub replies: Vec<String>,
    /// Kind of answer the last reply waits for, if any.
    pub expecting: Option<&'static str>,
    pub booking: Option<BookingDetails>,
    pub status: TurnStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interruption {
    Help,
    Cancel,
}

impl Interruption {
    fn detect(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "help" | "?" => Some(Interruption::Help),
            "cancel" | "quit" => Some(Interruption::Cancel),
            _ => None,
        }
    }
}

/// Runs one turn of a conversation. Turns for the same conversation are
/// serialized; conversation and user state are saved on every turn.
pub async fn process_message(
    state: &Arc<AppState>,
    conversation_id: &str,
    user_id: &str,
    text: &str,
) -> anyhow::Result<TurnOutcome> {
    let slot = state.turn_locks.acquire(conversation_id);
    let _turn = slot.lock().await;
    run_turn(state, conversation_id, user_id, text).await
}

async fn run_turn(
    state: &Arc<AppState>,
    conversation_id: &str,
    user_id: &str,
    text: &str,
) -> anyhow::Result<TurnOutcome> {
    let ttl = Duration::minutes(state.config.conversation_ttl_minutes);

    let (conv, user) = {
        let db = state.db()?;
        (
            queries::get_conversation(&db, conversation_id)?,
            queries::get_user(&db, user_id)?,
        )
    };
    let mut conv = conv.unwrap_or_else(|| new_conversation(conversation_id, ttl));
    let mut user = user.unwrap_or_else(|| new_user(user_id));

    let mut replies = Vec::new();

    let turn = match conv.dialog.take() {
        Some(dialog_state) => match Interruption::detect(text) {
            Some(Interruption::Help) => {
                tracing::info!(conversation = conversation_id, step = dialog_state.step.as_str(), "help requested");
                replies.push(HELP_TEXT.to_string());
                let prompt = dialog_state.current_prompt();
                DialogTurn::Prompt {
                    state: dialog_state,
                    prompt,
                }
            }
            Some(Interruption::Cancel) => {
                tracing::info!(conversation = conversation_id, step = dialog_state.step.as_str(), "dialog cancelled");
                replies.push(CANCEL_TEXT.to_string());
                let outcome = TurnOutcome {
                    replies,
                    expecting: None,
                    booking: None,
                    status: TurnStatus::Cancelled,
                };
                return finish_turn(state, conv, user, ttl, None, outcome);
            }
            None => dialog::resume(dialog_state, text),
        },
        None => {
            let booking = prefill_booking(state, text, &mut replies).await;
            dialog::begin(booking)
        }
    };

    let mut confirmed = None;
    let outcome = match turn {
        DialogTurn::Prompt {
            state: dialog_state,
            prompt,
        } => {
            tracing::info!(
                conversation = conversation_id,
                step = dialog_state.step.as_str(),
                "awaiting reply"
            );
            replies.push(prompt.text().to_string());
            conv.dialog = Some(dialog_state);
            TurnOutcome {
                replies,
                expecting: Some(prompt.kind()),
                booking: None,
                status: TurnStatus::Prompting,
            }
        }
        DialogTurn::Complete(Some(booking)) => {
            let record = BookingRecord {
                id: uuid::Uuid::new_v4().to_string(),
                conversation_id: conversation_id.to_string(),
                user_id: user_id.to_string(),
                destination: booking.destination_text().to_string(),
                origin: booking.origin_text().to_string(),
                travel_date: booking.travel_date.clone(),
                created_at: Utc::now().naive_utc(),
            };
            user.completed_bookings += 1;

            tracing::info!(
                conversation = conversation_id,
                booking_id = %record.id,
                destination = %record.destination,
                origin = %record.origin,
                "booking confirmed"
            );

            replies.push(format!(
                "I have you booked to {} from {}.",
                record.destination, record.origin
            ));
            replies.push(FOLLOW_UP_TEXT.to_string());
            confirmed = Some(record);
            TurnOutcome {
                replies,
                expecting: None,
                booking: Some(booking),
                status: TurnStatus::Booked,
            }
        }
        DialogTurn::Complete(None) => {
            tracing::info!(conversation = conversation_id, "booking declined");
            replies.push(FOLLOW_UP_TEXT.to_string());
            TurnOutcome {
                replies,
                expecting: None,
                booking: None,
                status: TurnStatus::Declined,
            }
        }
    };

    finish_turn(state, conv, user, ttl, confirmed.as_ref(), outcome)
}

/// Stores the confirmed booking (if any) together with the conversation and
/// user state, all or nothing. A failed save leaves the dialog where it was.
fn finish_turn(
    state: &Arc<AppState>,
    mut conv: Conversation,
    mut user: UserProfile,
    ttl: Duration,
    booking: Option<&BookingRecord>,
    outcome: TurnOutcome,
) -> anyhow::Result<TurnOutcome> {
    let now = Utc::now().naive_utc();
    conv.last_activity = now;
    conv.expires_at = now + ttl;
    user.turn_count += 1;
    user.last_seen = now;

    let mut db = state.db()?;
    let tx = db
        .transaction()
        .context("failed to start turn transaction")?;
    if let Some(record) = booking {
        queries::create_booking(&tx, record)?;
    }
    queries::save_conversation(&tx, &conv)?;
    queries::save_user(&tx, &user)?;
    tx.commit().context("failed to commit turn")?;

    Ok(outcome)
}

/// Pre-fills slots from the recognizer when it is configured. Any recognizer
/// failure only costs the pre-fill for this turn.
async fn prefill_booking(
    state: &Arc<AppState>,
    text: &str,
    replies: &mut Vec<String>,
) -> BookingDetails {
    let mut booking = BookingDetails::default();

    if !state.recognizer.is_configured() {
        tracing::debug!("recognizer not configured, starting booking without pre-fill");
        return booking;
    }

    let result = match state.recognizer.recognize(text).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "entity recognition failed, starting booking without pre-fill");
            return booking;
        }
    };

    let origin = extract_origin(&result);
    let destination = extract_destination(&result);
    let direction = extract_direction(&result);

    tracing::info!(
        intent = ?result.top_intent,
        origin = %origin.city,
        destination = %destination.city,
        direction = %direction.direction,
        "recognized entities"
    );

    let mut unsupported = Vec::new();
    if !origin.city.is_empty() && origin.airport.is_empty() {
        unsupported.push(origin.city.clone());
    }
    if !destination.city.is_empty() && destination.airport.is_empty() {
        unsupported.push(destination.city.clone());
    }
    if !unsupported.is_empty() {
        replies.push(format!(
            "Sorry but the following airports are not supported: {}",
            unsupported.join(", ")
        ));
    }

    if !origin.airport.is_empty() {
        booking.origin = Some(origin.airport);
    }
    if !destination.airport.is_empty() {
        booking.destination = Some(destination.airport);
    }

    booking
}

fn new_conversation(id: &str, ttl: Duration) -> Conversation {
    let now = Utc::now().naive_utc();
    Conversation {
        id: id.to_string(),
        dialog: None,
        last_activity: now,
        expires_at: now + ttl,
    }
}

fn new_user(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        turn_count: 0,
        completed_bookings: 0,
        last_seen: Utc::now().naive_utc(),
    }
}
