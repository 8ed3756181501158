//! Per-visitor client storage extractor.
//!
//! Stages the visitor's storage values into a [`MemoryStorage`] so the core
//! stores can run synchronously, then writes back only the keys that changed.
//!
//! Returning visitors are served under their session lock from extraction
//! until [`ClientStorage::commit`] (or drop), and their changes go straight
//! to the store record. A new visitor's values go through the request's
//! [`Session`], which the session layer saves and hands a cookie for.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;
use tower_sessions::Session;
use tower_sessions::session::Record;

use stride_core::storage::keys;
use stride_core::{CartStore, ChatSessionId, MemoryStorage, Storage, Theme, WishlistStore};

use crate::error::AppError;
use crate::middleware::session::VisitorSessions;
use crate::state::AppState;

/// Values every page shell needs: theme plus the header badges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout {
    pub theme: Theme,
    pub cart_count: u32,
    pub wishlist_count: usize,
}

/// Where committed values end up.
enum Backing {
    /// Returning visitor: their record, written under their lock.
    Record {
        sessions: VisitorSessions,
        record: Record,
        _guard: OwnedMutexGuard<()>,
    },
    /// New (or expired) visitor: the request's own session.
    Session(Session),
}

/// Extractor giving handlers local-storage-like access for the visitor.
///
/// Handlers that mutate anything must call [`ClientStorage::commit`] before
/// responding, otherwise the change is dropped with the request.
pub struct ClientStorage {
    backing: Backing,
    storage: MemoryStorage,
}

impl<S> FromRequestParts<S> for ClientStorage
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        let state = AppState::from_ref(state);

        Self::load(session, state.sessions()).await
    }
}

impl ClientStorage {
    /// Stage every known storage key for the visitor behind `session`.
    ///
    /// Waits for any other in-flight request of the same visitor to commit
    /// or finish first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session, sessions: &VisitorSessions) -> Result<Self, AppError> {
        if let Some(id) = session.id() {
            let guard = sessions.lock(id).await;
            if let Some(record) = sessions.load(id).await? {
                let values = keys::ALL.into_iter().filter_map(|key| {
                    record
                        .data
                        .get(key)
                        .and_then(Value::as_str)
                        .map(|value| (key, value.to_string()))
                });
                return Ok(Self {
                    storage: MemoryStorage::with_values(values),
                    backing: Backing::Record {
                        sessions: sessions.clone(),
                        record,
                        _guard: guard,
                    },
                });
            }
            tracing::debug!("Session cookie without a stored session, starting fresh");
        }

        let mut values = Vec::with_capacity(keys::ALL.len());
        for key in keys::ALL {
            if let Some(value) = session.get::<String>(key).await? {
                values.push((key, value));
            }
        }

        Ok(Self {
            storage: MemoryStorage::with_values(values),
            backing: Backing::Session(session),
        })
    }

    /// Open the visitor's cart.
    pub fn cart(&mut self) -> CartStore<&mut MemoryStorage> {
        CartStore::hydrate(&mut self.storage)
    }

    /// Open the visitor's wishlist.
    pub fn wishlist(&mut self) -> WishlistStore<&mut MemoryStorage> {
        WishlistStore::hydrate(&mut self.storage)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::from_stored(self.storage.get_item(keys::THEME).as_deref())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.storage
            .set_item(keys::THEME, theme.as_str().to_string());
    }

    /// The visitor's chat conversation id, minted on first use.
    pub fn chat_session_id(&mut self) -> ChatSessionId {
        if let Some(id) = self
            .storage
            .get_item(keys::CHAT_SESSION_ID)
            .as_deref()
            .and_then(ChatSessionId::from_stored)
        {
            return id;
        }

        let id = ChatSessionId::generate();
        self.storage
            .set_item(keys::CHAT_SESSION_ID, id.as_str().to_string());
        id
    }

    /// Theme and badge counts for the page shell.
    pub fn layout(&mut self) -> Layout {
        let theme = self.theme();
        let cart_count = self.cart().cart().item_count();
        let wishlist_count = self.wishlist().wishlist().len();
        Layout {
            theme,
            cart_count,
            wishlist_count,
        }
    }

    /// Write changed keys back and release the visitor's lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn commit(self) -> Result<(), AppError> {
        let Self { backing, storage } = self;
        let dirty = storage.dirty_keys();

        match backing {
            Backing::Record {
                sessions,
                mut record,
                _guard,
            } => {
                if dirty.is_empty() {
                    return Ok(());
                }
                for key in dirty {
                    match storage.get_item(key) {
                        Some(value) => {
                            record.data.insert(key.clone(), Value::String(value));
                        }
                        None => {
                            record.data.remove(key);
                        }
                    }
                }
                sessions.save(&mut record).await?;
            }
            Backing::Session(session) => {
                for key in dirty {
                    match storage.get_item(key) {
                        Some(value) => session.insert(key, value).await?,
                        None => {
                            session.remove::<String>(key).await?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
