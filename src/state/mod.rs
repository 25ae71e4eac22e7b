pub(crate) mod toast;

use crate::api::SupabaseClient;
use crate::auth::{Session, SessionHub, Subscription};
use crate::config::EnvConfig;
use crate::flows::account::load_profile;
use crate::flows::FlowError;
use crate::models::Profile;
use crate::storage::{load_json_from_storage, save_json_to_storage, THEME_KEY};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(crate) use toast::{ToastKind, ToastQueue};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }

    /// Set or clear the `dark` class on `<html>`.
    fn apply_to_document(self) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let _ = root
            .class_list()
            .toggle_with_force("dark", self == Theme::Dark);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    client: StoredValue<SupabaseClient>,

    /// Mirrors the session hub for views and route guards.
    pub session: RwSignal<Option<Session>>,

    /// The signed-in viewer's profile row, for the points and level chip.
    pub profile: RwSignal<Option<Profile>>,

    pub theme: RwSignal<Theme>,
    pub toasts: RwSignal<ToastQueue>,

    /// App-lifetime hub listeners (storage mirror, `session` signal).
    _subscriptions: StoredValue<Vec<Subscription>>,
}

impl AppState {
    pub fn new() -> Self {
        let sessions = SessionHub::restore();
        let client = SupabaseClient::new(EnvConfig::from_window(), sessions.clone());

        let session = RwSignal::new(sessions.current());
        let mirror = sessions.subscribe(move |_, s| session.set(s.cloned()));
        let persist = sessions.persist_to_storage();

        let theme = load_json_from_storage::<Theme>(THEME_KEY).unwrap_or_default();
        theme.apply_to_document();

        Self {
            client: StoredValue::new(client),
            session,
            profile: RwSignal::new(None),
            theme: RwSignal::new(theme),
            toasts: RwSignal::new(ToastQueue::default()),
            _subscriptions: StoredValue::new(vec![mirror, persist]),
        }
    }

    /// Shares the session hub with every other clone.
    pub fn client(&self) -> SupabaseClient {
        self.client.get_value()
    }

    pub fn user_id(&self) -> Option<String> {
        self.session.get_untracked().map(|s| s.user.id)
    }

    pub fn bucket(&self) -> String {
        self.client.with_value(|c| c.config.storage_bucket.clone())
    }

    /// Re-read the viewer's profile; cleared when signed out.
    pub fn refresh_profile(&self) {
        let state = *self;
        let Some(user_id) = self.user_id() else {
            self.profile.set(None);
            return;
        };
        spawn_local(async move {
            match load_profile(&state.client(), Some(&user_id)).await {
                Ok(p) => state.profile.set(Some(p)),
                Err(e) => tracing::warn!(error = %e, "profile unavailable"),
            }
        });
    }

    pub fn toggle_theme(&self) {
        let next = self.theme.get_untracked().toggled();
        next.apply_to_document();
        save_json_to_storage(THEME_KEY, &next);
        self.theme.set(next);
    }

    /// Queue a toast and schedule its removal.
    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let toasts = self.toasts;
        let mut id = 0;
        toasts.update(|q| id = q.push(kind, message));
        set_timeout(move || toasts.update(|q| q.dismiss(id)), TOAST_TTL);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastKind::Success, message);
    }

    pub fn flow_error(&self, context: &str, err: &FlowError) {
        tracing::error!(context, error = %err, "request failed");
        self.notify(ToastKind::Error, err.user_message());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggles_and_serializes() {
        assert_eq!(Theme::default().toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(Theme::Light.menu_label(), "Dark mode");
    }
}
