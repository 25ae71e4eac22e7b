pub(crate) mod query;
pub(crate) mod supabase;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub(crate) use query::{Direction, Filter, Query};
pub(crate) use supabase::SupabaseClient;

/// Postgres `unique_violation`.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    Storage,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    /// Machine-readable code from the backend (Postgres SQLSTATE for table calls).
    pub code: Option<String>,
    pub message: String,
}

/// Error body shared by the table, auth and storage endpoints. Each service
/// fills a different subset of these fields.
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::new(ApiErrorKind::Network, e.to_string())
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Parse, e.to_string())
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, message)
    }

    /// Build an error from a non-2xx response body, keeping the backend's code and message.
    pub(crate) fn from_response(status: u16, body: &str, kind: ApiErrorKind) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed
            .code
            .as_ref()
            .and_then(|c| match c {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .or(parsed.error_code);

        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed ({status})"));

        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            kind
        };

        Self {
            kind,
            code,
            message,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// The hosted backend as seen by page flows: table reads/writes, object storage
/// and remote procedures. Auth lives on [`SupabaseClient`] directly since only
/// the auth page and the session hub need it.
///
/// `?Send`: the browser build runs on a single thread and reqwest's wasm futures
/// are not `Send`.
#[async_trait(?Send)]
pub(crate) trait Backend {
    async fn select(&self, query: &Query) -> ApiResult<Vec<serde_json::Value>>;

    async fn insert(&self, table: &str, row: serde_json::Value) -> ApiResult<()>;

    /// Insert or merge on the given conflict columns.
    async fn upsert(&self, table: &str, row: serde_json::Value, on_conflict: &[&str]) -> ApiResult<()>;

    async fn update(&self, table: &str, patch: serde_json::Value, filters: &[Filter]) -> ApiResult<()>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> ApiResult<()>;

    /// Store `bytes` under `key`; returns the stored object path.
    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<String>;

    async fn remove_object(&self, bucket: &str, key: &str) -> ApiResult<()>;

    fn public_url(&self, bucket: &str, key: &str) -> String;

    async fn rpc(&self, name: &str, args: serde_json::Value) -> ApiResult<serde_json::Value>;
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> ApiResult<Vec<T>> {
    rows.into_iter()
        .map(|r| serde_json::from_value(r).map_err(ApiError::parse))
        .collect()
}

pub(crate) async fn fetch_all<B, T>(backend: &B, query: &Query) -> ApiResult<Vec<T>>
where
    B: Backend + ?Sized,
    T: DeserializeOwned,
{
    decode_rows(backend.select(query).await?)
}

/// First row or `None`; the `maybeSingle` shape.
pub(crate) async fn fetch_optional<B, T>(backend: &B, query: Query) -> ApiResult<Option<T>>
where
    B: Backend + ?Sized,
    T: DeserializeOwned,
{
    let rows = backend.select(&query.limit(1)).await?;
    match rows.into_iter().next() {
        Some(row) => serde_json::from_value(row).map(Some).map_err(ApiError::parse),
        None => Ok(None),
    }
}
