use serde::{Deserialize, Serialize};

pub(crate) const SESSION_KEY: &str = "padhai_session";
pub(crate) const THEME_KEY: &str = "padhai_theme";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::auth::{test_session, Session, SessionHub};
    use crate::auth::AuthEvent;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn json_roundtrip_and_remove() {
        save_json_to_storage("padhai_test", &vec![1, 2, 3]);
        assert_eq!(load_json_from_storage::<Vec<i32>>("padhai_test"), Some(vec![1, 2, 3]));
        remove_from_storage("padhai_test");
        assert!(load_json_from_storage::<Vec<i32>>("padhai_test").is_none());
    }

    #[wasm_bindgen_test]
    fn session_survives_reload_and_sign_out_clears_it() {
        remove_from_storage(SESSION_KEY);

        let hub = SessionHub::restore();
        let _persist = hub.persist_to_storage();
        hub.publish(AuthEvent::SignedIn, Some(test_session("u1")));

        let restored: Option<Session> = load_json_from_storage(SESSION_KEY);
        assert_eq!(restored.map(|s| s.user.id).as_deref(), Some("u1"));
        assert_eq!(SessionHub::restore().user_id().as_deref(), Some("u1"));

        hub.publish(AuthEvent::SignedOut, None);
        assert!(SessionHub::restore().current().is_none());
    }
}
