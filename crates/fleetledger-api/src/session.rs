//! Per-browser workspaces keyed by the `fl_session` cookie
//!
//! Sessions live in memory and are dropped after sitting idle. Each request
//! takes the map lock for one synchronous domain call.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use fleetledger_config::ServerConfig;
use fleetledger_core::{ChartOfAccounts, Workspace};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "fl_session";

/// The caller's session for one request
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Created by this request, so the cookie still has to be sent
    pub fresh: bool,
}

impl Session {
    /// Attach the session cookie when the browser does not have it yet
    pub fn respond(&self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if self.fresh {
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }
        response
    }
}

struct SessionSlot {
    workspace: Workspace,
    last_seen: Instant,
}

impl SessionSlot {
    fn new(seed: &ChartOfAccounts) -> Self {
        Self {
            workspace: Workspace::new(seed.clone()),
            last_seen: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    seed: Arc<ChartOfAccounts>,
    idle: Duration,
    capacity: usize,
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl SessionStore {
    pub fn new(seed: ChartOfAccounts, config: &ServerConfig) -> Self {
        Self::with_limits(
            seed,
            Duration::from_secs(config.session_idle_minutes.saturating_mul(60)),
            config.max_sessions,
        )
    }

    pub fn with_limits(seed: ChartOfAccounts, idle: Duration, capacity: usize) -> Self {
        Self {
            seed: Arc::new(seed),
            idle,
            capacity: capacity.max(1),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Find the caller's session or open a new one.
    ///
    /// Idle sessions are swept first. When the store is still full the least
    /// recently used session makes room for the new one.
    pub async fn resolve(&self, headers: &HeaderMap) -> Session {
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, slot| slot.last_seen.elapsed() < self.idle);
        if sessions.len() < before {
            log::debug!("Expired {} idle sessions", before - sessions.len());
        }

        if let Some(id) = cookie_value(headers, SESSION_COOKIE) {
            if let Some(slot) = sessions.get_mut(&id) {
                slot.last_seen = Instant::now();
                return Session { id, fresh: false };
            }
        }

        if sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                log::warn!("Session limit {} reached; dropped {}", self.capacity, oldest);
            }
        }

        let id = fleetledger_utils::generate_id();
        sessions.insert(id.clone(), SessionSlot::new(&self.seed));
        log::info!("Opened session {} ({} active)", id, sessions.len());
        Session { id, fresh: true }
    }

    pub async fn read<R>(&self, session: &Session, f: impl FnOnce(&Workspace) -> R) -> R {
        let sessions = self.sessions.read().await;
        match sessions.get(&session.id) {
            Some(slot) => f(&slot.workspace),
            None => f(&Workspace::new(self.seed.as_ref().clone())),
        }
    }

    pub async fn write<R>(&self, session: &Session, f: impl FnOnce(&mut Workspace) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .entry(session.id.clone())
            .or_insert_with(|| SessionSlot::new(&self.seed));
        slot.last_seen = Instant::now();
        f(&mut slot.workspace)
    }
}

/// Value of one cookie from the `Cookie` header(s)
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
