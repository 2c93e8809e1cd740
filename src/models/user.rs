use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub turn_count: i64,
    pub completed_bookings: i64,
    pub last_seen: NaiveDateTime,
}
