//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session registry.

use crate::config::Config;
use chrono::{DateTime, Duration, Utc};
use mindreflect_core::ports::{CoachingService, SentimentAnalysisService};
use mindreflect_core::scoring::MoodScoreCache;
use mindreflect_core::session::SessionContext;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Sessions)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sentiment_adapter: Arc<dyn SentimentAnalysisService>,
    pub coaching_adapter: Arc<dyn CoachingService>,
    pub sessions: Arc<SessionRegistry>,
    pub score_cache: Arc<MoodScoreCache>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        sentiment_adapter: Arc<dyn SentimentAnalysisService>,
        coaching_adapter: Arc<dyn CoachingService>,
    ) -> Self {
        let idle_timeout = Duration::minutes(config.session_idle_minutes);
        Self {
            config,
            sentiment_adapter,
            coaching_adapter,
            sessions: Arc::new(SessionRegistry::new(idle_timeout)),
            score_cache: Arc::new(MoodScoreCache::new()),
        }
    }
}

//=========================================================================================
// SessionRegistry (One SessionContext per Browser Session)
//=========================================================================================

/// A session's context. The mutex serializes that session's handlers.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// The session resolved for the current request, placed in request extensions
/// by the session middleware.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub context: SessionHandle,
}

struct SessionSlot {
    context: SessionHandle,
    last_accessed_at: DateTime<Utc>,
}

pub struct SessionRegistry {
    slots: Mutex<HashMap<Uuid, SessionSlot>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Returns the live session for `id`, or creates a new one. The boolean is
    /// `true` when a session was created. Idle sessions are swept first.
    pub async fn resolve(&self, id: Option<Uuid>, now: DateTime<Utc>) -> (CurrentSession, bool) {
        let mut slots = self.slots.lock().await;

        let before = slots.len();
        slots.retain(|_, slot| now - slot.last_accessed_at <= self.idle_timeout);
        let swept = before - slots.len();
        if swept > 0 {
            info!("Expired {} idle session(s)", swept);
        }

        if let Some(id) = id {
            if let Some(slot) = slots.get_mut(&id) {
                slot.last_accessed_at = slot.last_accessed_at.max(now);
                let session = CurrentSession {
                    id,
                    context: slot.context.clone(),
                };
                return (session, false);
            }
        }

        let id = Uuid::new_v4();
        let context = Arc::new(Mutex::new(SessionContext::new(now)));
        slots.insert(
            id,
            SessionSlot {
                context: context.clone(),
                last_accessed_at: now,
            },
        );
        debug!("Created session {}", id);
        (CurrentSession { id, context }, true)
    }

    /// Ends a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.slots.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_or_missing_ids_create_sessions() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let now = Utc::now();

        let (first, created) = registry.resolve(None, now).await;
        assert!(created);
        let (stale, created) = registry.resolve(Some(Uuid::new_v4()), now).await;
        assert!(created);
        assert_ne!(first.id, stale.id);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn known_ids_share_one_context() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let now = Utc::now();

        let (first, _) = registry.resolve(None, now).await;
        let (again, created) = registry.resolve(Some(first.id), now).await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first.context, &again.context));
    }

    #[tokio::test]
    async fn idle_sessions_are_swept_on_access() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let start = Utc::now();

        let (kept, _) = registry.resolve(None, start).await;
        let (dropped, _) = registry.resolve(None, start).await;
        registry
            .resolve(Some(kept.id), start + Duration::minutes(40))
            .await;

        let (_, created) = registry
            .resolve(Some(dropped.id), start + Duration::minutes(90))
            .await;
        assert!(created);
        let (_, created) = registry
            .resolve(Some(kept.id), start + Duration::minutes(90))
            .await;
        assert!(!created);
    }

    #[tokio::test]
    async fn removed_sessions_are_gone() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let (session, _) = registry.resolve(None, Utc::now()).await;

        assert!(registry.remove(session.id).await);
        assert!(!registry.remove(session.id).await);
        assert!(registry.is_empty().await);
    }
}
