//! Session middleware configuration.
//!
//! Sessions back the visitor's client storage (cart, wishlist, chat session,
//! theme). They live in process memory only and vanish on restart.
//!
//! Returning visitors' storage is read and written straight against their
//! store record while holding a per-session lock, so overlapping requests
//! from one visitor (two tabs, a slow checkout) apply their changes in turn
//! instead of the last response overwriting the whole session.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, Weak};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stride_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

type LockMap = HashMap<Id, Weak<Mutex<()>>>;

/// The session store plus one lock per visitor with a request in flight.
#[derive(Clone, Default)]
pub struct VisitorSessions {
    store: MemoryStore,
    locks: Arc<std::sync::Mutex<LockMap>>,
}

impl VisitorSessions {
    /// Handle to the backing store, shared with the session layer.
    #[must_use]
    pub fn store(&self) -> MemoryStore {
        self.store.clone()
    }

    /// Wait for exclusive access to a visitor's session.
    ///
    /// Entries are dropped once nobody holds or waits on them, so the map
    /// only ever holds visitors with requests in flight.
    pub async fn lock(&self, id: Id) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| lock.strong_count() > 0);
            if let Some(lock) = locks.get(&id).and_then(Weak::upgrade) {
                lock
            } else {
                let lock = Arc::new(Mutex::new(()));
                locks.insert(id, Arc::downgrade(&lock));
                lock
            }
        };

        lock.lock_owned().await
    }

    /// Load a visitor's record, `None` if it expired or never existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(&self, id: Id) -> session_store::Result<Option<Record>> {
        self.store.load(&id).await
    }

    /// Write a record back, pushing its expiry out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn save(&self, record: &mut Record) -> session_store::Result<()> {
        record.expiry_date = OffsetDateTime::now_utc() + Duration::seconds(SESSION_EXPIRY_SECONDS);
        self.store.save(record).await
    }
}

/// Create the session layer over the visitors' store.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
    sessions: &VisitorSessions,
) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(sessions.store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
