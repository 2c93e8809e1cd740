use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{BookingRecord, Conversation, DialogState, UserProfile};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Conversations ──

/// Returns the conversation unless it is missing or has expired.
pub fn get_conversation(conn: &Connection, id: &str) -> anyhow::Result<Option<Conversation>> {
    let now = format_ts(&Utc::now().naive_utc());
    let row = conn
        .query_row(
            "SELECT id, dialog_state, last_activity, expires_at FROM conversations WHERE id = ?1 AND expires_at > ?2",
            params![id, now],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((id, dialog_json, last_activity, expires_at)) = row else {
        return Ok(None);
    };

    // A state blob that no longer parses restarts the dialog rather than
    // wedging the conversation.
    let dialog = dialog_json.and_then(|json| match serde_json::from_str::<DialogState>(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(conversation = %id, error = %e, "discarding unreadable dialog state");
            None
        }
    });

    Ok(Some(Conversation {
        id,
        dialog,
        last_activity: parse_ts(&last_activity),
        expires_at: parse_ts(&expires_at),
    }))
}

pub fn save_conversation(conn: &Connection, conv: &Conversation) -> anyhow::Result<()> {
    let dialog_json = conv
        .dialog
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO conversations (id, dialog_state, last_activity, expires_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            dialog_state = excluded.dialog_state,
            last_activity = excluded.last_activity,
            expires_at = excluded.expires_at",
        params![
            conv.id,
            dialog_json,
            format_ts(&conv.last_activity),
            format_ts(&conv.expires_at),
        ],
    )?;
    Ok(())
}

pub fn expire_old_conversations(conn: &Connection) -> anyhow::Result<usize> {
    let now = format_ts(&Utc::now().naive_utc());
    let count = conn.execute("DELETE FROM conversations WHERE expires_at <= ?1", params![now])?;
    Ok(count)
}

// ── Users ──

pub fn get_user(conn: &Connection, id: &str) -> anyhow::Result<Option<UserProfile>> {
    let user = conn
        .query_row(
            "SELECT id, turn_count, completed_bookings, last_seen FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(UserProfile {
                    id: row.get(0)?,
                    turn_count: row.get(1)?,
                    completed_bookings: row.get(2)?,
                    last_seen: parse_ts(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn save_user(conn: &Connection, user: &UserProfile) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, turn_count, completed_bookings, last_seen)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            turn_count = excluded.turn_count,
            completed_bookings = excluded.completed_bookings,
            last_seen = excluded.last_seen",
        params![
            user.id,
            user.turn_count,
            user.completed_bookings,
            format_ts(&user.last_seen),
        ],
    )?;
    Ok(())
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &BookingRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, conversation_id, user_id, destination, origin, travel_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking.id,
            booking.conversation_id,
            booking.user_id,
            booking.destination,
            booking.origin,
            booking.travel_date,
            format_ts(&booking.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<BookingRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, conversation_id, user_id, destination, origin, travel_date, created_at
         FROM bookings ORDER BY created_at DESC, rowid DESC LIMIT ?1",
    )?;

    let bookings = stmt
        .query_map(params![limit], |row| {
            Ok(BookingRecord {
                id: row.get(0)?,
                conversation_id: row.get(1)?,
                user_id: row.get(2)?,
                destination: row.get(3)?,
                origin: row.get(4)?,
                travel_date: row.get(5)?,
                created_at: parse_ts(&row.get::<_, String>(6)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::db::init_db;
    use crate::models::{BookingDetails, DialogStep};

    fn conversation(id: &str, ttl_minutes: i64) -> Conversation {
        let now = Utc::now().naive_utc();
        Conversation {
            id: id.to_string(),
            dialog: Some(DialogState {
                step: DialogStep::Origin,
                booking: BookingDetails {
                    destination: Some("Paris".to_string()),
                    origin: None,
                    travel_date: None,
                },
            }),
            last_activity: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn test_conversation_round_trip() {
        let conn = init_db(":memory:").unwrap();
        save_conversation(&conn, &conversation("c1", 30)).unwrap();

        let loaded = get_conversation(&conn, "c1").unwrap().unwrap();
        let dialog = loaded.dialog.unwrap();
        assert_eq!(dialog.step, DialogStep::Origin);
        assert_eq!(dialog.booking.destination.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_expired_conversation_is_absent() {
        let conn = init_db(":memory:").unwrap();
        save_conversation(&conn, &conversation("old", -5)).unwrap();
        save_conversation(&conn, &conversation("fresh", 30)).unwrap();

        assert!(get_conversation(&conn, "old").unwrap().is_none());
        assert_eq!(expire_old_conversations(&conn).unwrap(), 1);
        assert!(get_conversation(&conn, "fresh").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_dialog_state_is_dropped() {
        let conn = init_db(":memory:").unwrap();
        save_conversation(&conn, &conversation("c1", 30)).unwrap();
        conn.execute("UPDATE conversations SET dialog_state = 'not json' WHERE id = 'c1'", [])
            .unwrap();

        let loaded = get_conversation(&conn, "c1").unwrap().unwrap();
        assert!(loaded.dialog.is_none());
    }

    #[test]
    fn test_user_upsert() {
        let conn = init_db(":memory:").unwrap();
        let mut user = UserProfile {
            id: "u1".to_string(),
            turn_count: 1,
            completed_bookings: 0,
            last_seen: Utc::now().naive_utc(),
        };
        save_user(&conn, &user).unwrap();
        user.turn_count = 2;
        user.completed_bookings = 1;
        save_user(&conn, &user).unwrap();

        let loaded = get_user(&conn, "u1").unwrap().unwrap();
        assert_eq!(loaded.turn_count, 2);
        assert_eq!(loaded.completed_bookings, 1);
        assert!(get_user(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_bookings_newest_first() {
        let conn = init_db(":memory:").unwrap();
        let now = Utc::now().naive_utc();
        for (i, destination) in ["Paris", "Rome"].iter().enumerate() {
            create_booking(
                &conn,
                &BookingRecord {
                    id: format!("b{i}"),
                    conversation_id: "c1".to_string(),
                    user_id: "u1".to_string(),
                    destination: destination.to_string(),
                    origin: "Seattle".to_string(),
                    travel_date: None,
                    created_at: now + Duration::seconds(i as i64),
                },
            )
            .unwrap();
        }

        let bookings = list_bookings(&conn, 10).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].destination, "Rome");
    }
}
