use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::DialogState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub dialog: Option<DialogState>,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}
