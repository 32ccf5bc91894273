//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the loaded logo, branding strings, the auth gate, and the
//! session registry. Each session's `SessionContext` is checked out at the
//! start of a request and written back only when the render cycle succeeds.
//! Every stored entry carries a generation; a write-back from a cycle that
//! read an older generation (or an entry since removed by logout) is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::assets::EncodedAsset;
use crate::branding::Branding;
use crate::config::AppConfig;
use crate::services::auth_gate::AuthGate;
use crate::services::credentials::CredentialStore;
use crate::services::session::SessionContext;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// SESSION REGISTRY
// =============================================================================

struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
    generation: u64,
}

/// A context checked out for one cycle. `generation` identifies the registry
/// entry it was read from; 0 when there was none.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub context: SessionContext,
    pub generation: u64,
}

/// Session contexts keyed by cookie token, with idle expiry.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
    next_generation: Arc<AtomicU64>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
            idle_ttl,
        }
    }

    /// Context for `token`. Unknown or idle-expired sessions start logged out.
    pub async fn checkout(&self, token: &str) -> Checkout {
        let mut sessions = self.inner.write().await;
        match sessions.get(token) {
            Some(entry) if entry.last_seen.elapsed() <= self.idle_ttl => {
                return Checkout { context: entry.context.clone(), generation: entry.generation };
            }
            Some(_) => {}
            None => return Checkout { context: SessionContext::new(), generation: 0 },
        }

        if let Some(expired) = sessions.remove(token) {
            if let Some(username) = expired.context.username() {
                tracing::info!(%username, "session expired");
            }
        }
        Checkout { context: SessionContext::new(), generation: 0 }
    }

    /// Insert `context` as a new entry with its own generation.
    pub async fn store(&self, token: &str, context: SessionContext) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.inner.write().await;
        sessions.insert(token.to_owned(), SessionEntry { context, last_seen: Instant::now(), generation });
    }

    /// Write back a context checked out at `generation`. Returns false and
    /// leaves the registry untouched when the entry was removed or replaced
    /// since the checkout.
    pub async fn refresh(&self, token: &str, generation: u64, context: SessionContext) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(token) {
            Some(entry) if entry.generation == generation => {
                entry.context = context;
                entry.last_seen = Instant::now();
                true
            }
            _ => {
                tracing::debug!(generation, "stale session write discarded");
                false
            }
        }
    }

    pub async fn remove(&self, token: &str) {
        self.inner.write().await.remove(token);
    }

    /// Drop idle-expired sessions, returning how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= self.idle_ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Background task that prunes expired sessions once a minute.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let removed = registry.prune_expired().await;
                if removed > 0 {
                    let remaining = registry.len().await;
                    tracing::debug!(removed, remaining, "expired sessions pruned");
                }
            }
        })
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub branding: Arc<Branding>,
    pub logo: Arc<EncodedAsset>,
    pub gate: AuthGate,
    pub sessions: SessionRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, logo: EncodedAsset, store: Arc<dyn CredentialStore>) -> Self {
        let gate = AuthGate::new(config.widget.clone(), store);
        let sessions = SessionRegistry::new(config.session_idle_ttl);
        Self {
            config: Arc::new(config),
            branding: Arc::new(Branding::default()),
            logo: Arc::new(logo),
            gate,
            sessions,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
