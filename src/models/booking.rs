use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The slots a booking dialog fills. A slot holding `None` or a blank
/// string is treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingDetails {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub travel_date: Option<String>,
}

impl BookingDetails {
    pub fn has_destination(&self) -> bool {
        is_filled(self.destination.as_deref())
    }

    pub fn has_origin(&self) -> bool {
        is_filled(self.origin.as_deref())
    }

    pub fn destination_text(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }

    pub fn origin_text(&self) -> &str {
        self.origin.as_deref().unwrap_or_default()
    }
}

fn is_filled(slot: Option<&str>) -> bool {
    slot.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// A confirmed booking as stored by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub destination: String,
    pub origin: String,
    pub travel_date: Option<String>,
    pub created_at: NaiveDateTime,
}
