use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";
pub(crate) const DEFAULT_BUCKET: &str = "notes";

/// Runtime configuration injected by the hosting page.
///
/// `index.html` sets `window.ENV = { SUPABASE_URL, SUPABASE_ANON_KEY }` before the
/// wasm bundle loads. Lowercase keys are accepted too (older deploy scripts).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub storage_bucket: String,
}

impl EnvConfig {
    pub fn new(supabase_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: normalize_base_url(&supabase_url.into()),
            anon_key: anon_key.into(),
            storage_bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn from_window() -> Self {
        let url = read_env_string(&["SUPABASE_URL", "supabase_url"])
            .unwrap_or_else(|| DEFAULT_SUPABASE_URL.to_string());
        let key = read_env_string(&["SUPABASE_ANON_KEY", "supabase_anon_key"]).unwrap_or_default();

        let mut cfg = Self::new(url, key);
        if let Some(bucket) = read_env_string(&["NOTES_BUCKET", "notes_bucket"]) {
            if !bucket.trim().is_empty() {
                cfg.storage_bucket = bucket.trim().to_string();
            }
        }
        cfg
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.supabase_url, table)
    }

    pub fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.supabase_url, name)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.supabase_url, path.trim_start_matches('/'))
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.supabase_url,
            bucket,
            encode_object_key(key)
        )
    }

    pub fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.supabase_url,
            bucket,
            encode_object_key(key)
        )
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_window()
    }
}

fn read_env_string(keys: &[&str]) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Percent-encode each path segment of an object key, keeping the `/` separators.
pub(crate) fn encode_object_key(key: &str) -> String {
    key.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let cfg = EnvConfig::new("https://abc.supabase.co/ ", "anon");
        assert_eq!(cfg.supabase_url, "https://abc.supabase.co");
        assert_eq!(cfg.storage_bucket, "notes");
    }

    #[test]
    fn endpoint_urls() {
        let cfg = EnvConfig::new("https://abc.supabase.co", "anon");
        assert_eq!(cfg.rest_url("notes"), "https://abc.supabase.co/rest/v1/notes");
        assert_eq!(
            cfg.rpc_url("award_upload_points"),
            "https://abc.supabase.co/rest/v1/rpc/award_upload_points"
        );
        assert_eq!(
            cfg.auth_url("/token"),
            "https://abc.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn public_url_keeps_user_prefix() {
        let cfg = EnvConfig::new("https://abc.supabase.co", "anon");
        assert_eq!(
            cfg.public_object_url("notes", "u-1/1700000000000.pdf"),
            "https://abc.supabase.co/storage/v1/object/public/notes/u-1/1700000000000.pdf"
        );
    }

    #[test]
    fn object_key_segments_are_encoded() {
        assert_eq!(encode_object_key("u 1/a b.png"), "u%201/a%20b.png");
    }
}
