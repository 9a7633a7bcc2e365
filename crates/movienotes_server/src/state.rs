use std::sync::{Arc, Mutex, PoisonError};

use log::warn;

use movienotes_core::ServiceError;
use rusqlite::Connection;

use crate::error::ApiError;

/// Shared handler state: the single SQLite connection.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs a storage job on the blocking pool with exclusive connection access.
    ///
    /// A job that panicked left its transaction rolled back on unwind, so a
    /// poisoned lock still guards a usable connection.
    pub async fn run<T, F>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().unwrap_or_else(|poisoned| {
                warn!("event=db_lock_recover module=api status=error reason=poisoned");
                db.clear_poison();
                PoisonError::into_inner(poisoned)
            });
            job(&mut conn).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}
