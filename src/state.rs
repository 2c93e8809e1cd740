use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::recognizer::EntityRecognizer;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub recognizer: EntityRecognizer,
    pub turn_locks: TurnLocks,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig, recognizer: EntityRecognizer) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            recognizer,
            turn_locks: TurnLocks::default(),
        }
    }

    /// Never hold the returned guard across an `.await`.
    pub fn db(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

/// One async lock per conversation so turns of the same conversation never
/// overlap, while different conversations proceed independently.
#[derive(Default)]
pub struct TurnLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnLocks {
    /// Returns the slot for a conversation. The map entry is removed when the
    /// last slot for it is dropped, including when a turn is abandoned midway.
    pub fn acquire(&self, conversation_id: &str) -> TurnSlot<'_> {
        let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let lock = locks.entry(conversation_id.to_string()).or_default().clone();
        TurnSlot {
            locks: self,
            conversation_id: conversation_id.to_string(),
            lock,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct TurnSlot<'a> {
    locks: &'a TurnLocks,
    conversation_id: String,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl TurnSlot<'_> {
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for TurnSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one held here.
        if Arc::strong_count(&self.lock) <= 2 {
            locks.remove(&self.conversation_id);
        }
    }
}
