use crate::storage::{load_json_from_storage, remove_from_storage, save_json_to_storage, SESSION_KEY};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};

/// User object returned by the auth service.
///
/// Only the id and email are read; metadata stays opaque so new fields on the
/// backend do not break session parsing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Student".to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds; as returned by the token endpoint.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds. Filled from `expires_in` when the backend omits it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Fill `expires_at` from `expires_in` relative to `now_secs`.
    pub fn stamped(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|s| now_secs + s);
        }
        self
    }

    /// Expired, with a small margin so a token does not lapse mid-request.
    pub fn is_expired(&self, now_secs: i64) -> bool {
        match self.expires_at {
            Some(at) => now_secs + 10 >= at,
            None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

type Listener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct HubInner {
    session: Option<Session>,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Current session plus the set of components watching it.
///
/// Cloning shares the same hub. Listeners run synchronously inside
/// [`SessionHub::publish`], outside the lock.
#[derive(Clone, Default)]
pub(crate) struct SessionHub {
    inner: Arc<Mutex<HubInner>>,
}

impl SessionHub {
    pub fn new(initial: Option<Session>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                session: initial,
                ..Default::default()
            })),
        }
    }

    /// Hub seeded from local storage.
    pub fn restore() -> Self {
        Self::new(load_json_from_storage::<Session>(SESSION_KEY))
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.lock().ok().and_then(|g| g.session.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.current().map(|s| s.user.id)
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }

    /// Replace the session and notify every listener.
    pub fn publish(&self, event: AuthEvent, session: Option<Session>) {
        let listeners: Vec<Listener> = match self.inner.lock() {
            Ok(mut g) => {
                g.session = session.clone();
                g.listeners.iter().map(|(_, l)| l.clone()).collect()
            }
            Err(_) => return,
        };

        tracing::debug!(?event, listeners = listeners.len(), "session changed");

        for l in listeners {
            l(event, session.as_ref());
        }
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = match self.inner.lock() {
            Ok(mut g) => {
                g.next_id += 1;
                let id = g.next_id;
                g.listeners.push((id, Arc::new(listener)));
                id
            }
            Err(_) => 0,
        };

        Subscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Mirror every session change into local storage so a reload keeps the user
    /// signed in. The returned subscription must live as long as the app.
    pub fn persist_to_storage(&self) -> Subscription {
        self.subscribe(|_, session| match session {
            Some(s) => save_json_to_storage(SESSION_KEY, s),
            None => remove_from_storage(SESSION_KEY),
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().map(|g| g.listeners.len()).unwrap_or(0)
    }
}

/// Handle returned by [`SessionHub::subscribe`]. Dropping it unsubscribes.
pub(crate) struct Subscription {
    id: u64,
    hub: Weak<Mutex<HubInner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if let Ok(mut g) = inner.lock() {
                g.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn test_session(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: Some("refresh".to_string()),
        expires_in: Some(3600),
        expires_at: None,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(format!("{user_id}@example.com")),
            user_metadata: serde_json::json!({}),
        },
    }
}
