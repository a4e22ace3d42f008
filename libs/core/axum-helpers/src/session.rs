//! Cookie-backed sessions with a signed session id.

use async_trait::async_trait;
use axum::Router;
use core_config::session::SessionConfig;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

/// Name of the session id cookie.
pub const SESSION_COOKIE_NAME: &str = "todo.sid";

/// Sessions expire after this long without a request.
pub const SESSION_INACTIVITY_DAYS: i64 = 7;

/// In-process session store that forgets expired sessions.
///
/// Expired records are dropped whenever a new session is created, so the
/// store holds at most the sessions active within the inactivity window.
#[derive(Clone, Debug, Default)]
pub struct SessionMemoryStore(Arc<Mutex<HashMap<Id, Record>>>);

#[cfg(test)]
impl SessionMemoryStore {
    async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    async fn is_empty(&self) -> bool {
        self.0.lock().await.is_empty()
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for SessionMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.delete_expired().await?;

        let mut sessions = self.0.lock().await;
        while sessions.contains_key(&record.id) {
            record.id = Id::default();
        }
        sessions.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.0.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .0
            .lock()
            .await
            .get(id)
            .filter(|record| is_active(record))
            .cloned())
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.0.lock().await.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SessionMemoryStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let mut sessions = self.0.lock().await;
        let before = sessions.len();
        sessions.retain(|_, record| is_active(record));

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Dropped expired sessions");
        }
        Ok(())
    }
}

/// Derive a 64-byte cookie signing key from an arbitrary-length secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Wrap `router` in an in-memory session layer whose cookie is signed with
/// a key derived from `config.secret`.
///
/// A session is only stored once something is written to it, which in
/// practice means sign-in.
pub fn with_sessions(router: Router, config: &SessionConfig) -> Router {
    if config.uses_default_secret() {
        tracing::warn!("Session cookies are signed with the default secret; set SESSION_SECRET");
    }

    let layer = SessionManagerLayer::new(SessionMemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_INACTIVITY_DAYS)))
        .with_signed(signing_key(&config.secret));

    router.layer(layer)
}
