use super::query::{filter_pairs, Filter, Query};
use super::{ApiError, ApiErrorKind, ApiResult, Backend};
use crate::auth::{AuthEvent, Session, SessionHub};
use crate::config::EnvConfig;
use crate::util::now_secs;
use crate::validation::ValidAuth;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone, Debug)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize, Clone, Debug)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize, Clone, Debug)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SignUpOutcome {
    /// Email confirmation is off: the account is usable right away.
    SignedIn(Session),
    /// The backend sent a confirmation link; no session yet.
    ConfirmationSent,
}

/// Handle to the hosted auth/data/storage service.
///
/// Cheap to clone; every clone shares the same [`SessionHub`], so a sign-in on
/// one page is seen by the bearer token of every later request.
#[derive(Clone)]
pub(crate) struct SupabaseClient {
    pub(crate) config: EnvConfig,
    pub(crate) sessions: SessionHub,
}

impl SupabaseClient {
    pub fn new(config: EnvConfig, sessions: SessionHub) -> Self {
        Self { config, sessions }
    }

    /// Bearer for the next request: the user's access token, else the anon key.
    pub(crate) fn bearer(&self) -> String {
        self.sessions
            .access_token()
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn with_auth_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    async fn send(req: reqwest::RequestBuilder, kind: ApiErrorKind) -> ApiResult<reqwest::Response> {
        let res = req.send().await.map_err(ApiError::network)?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::from_response(status, &body, kind))
    }

    async fn read_json_or_null(res: reqwest::Response) -> ApiResult<serde_json::Value> {
        let text = res.text().await.map_err(ApiError::network)?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(ApiError::parse)
    }

    // ---- auth ----

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let req = reqwest::Client::new()
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrant { email, password });

        let res = Self::send(req, ApiErrorKind::Http).await?;
        let session: Session = res.json().await.map_err(ApiError::parse)?;
        let session = session.stamped(now_secs());

        tracing::info!(user_id = %session.user.id, "signed in");
        self.sessions.publish(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_up(&self, form: &ValidAuth) -> ApiResult<SignUpOutcome> {
        let data = serde_json::json!({
            "full_name": form.full_name,
            "university": form.university,
            "course": form.course,
        });
        let req = reqwest::Client::new()
            .post(self.config.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&SignUpRequest {
                email: &form.email,
                password: &form.password,
                data,
            });

        let res = Self::send(req, ApiErrorKind::Http).await?;
        let body = Self::read_json_or_null(res).await?;
        let outcome = parse_sign_up(body, now_secs());

        if let SignUpOutcome::SignedIn(s) = &outcome {
            self.sessions.publish(AuthEvent::SignedIn, Some(s.clone()));
        }
        Ok(outcome)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<Session> {
        let req = reqwest::Client::new()
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.anon_key)
            .json(&RefreshGrant { refresh_token });

        let res = Self::send(req, ApiErrorKind::Unauthorized).await?;
        let session: Session = res.json().await.map_err(ApiError::parse)?;
        let session = session.stamped(now_secs());
        self.sessions.publish(AuthEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    /// Start-up check for a persisted session: an expired token gets one refresh
    /// attempt; if that fails the session is dropped.
    pub async fn restore_session(&self) {
        let Some(session) = self.sessions.current() else {
            return;
        };
        if !session.is_expired(now_secs()) {
            return;
        }

        let refreshed = match session.refresh_token.as_deref() {
            Some(rt) => self.refresh_session(rt).await.map(|_| ()),
            None => Err(ApiError::unauthorized("Session expired")),
        };
        if let Err(e) = refreshed {
            tracing::warn!(error = %e, "stored session could not be refreshed; signing out");
            self.sessions.publish(AuthEvent::SignedOut, None);
        }
    }

    /// Revoke the token server-side, then clear the local session regardless.
    pub async fn sign_out(&self) {
        if self.sessions.current().is_some() {
            let req = self.with_auth_headers(reqwest::Client::new().post(self.config.auth_url("logout")));
            if let Err(e) = Self::send(req, ApiErrorKind::Http).await {
                tracing::warn!(error = %e, "logout request failed");
            }
        }
        self.sessions.publish(AuthEvent::SignedOut, None);
    }
}

pub(crate) fn parse_sign_up(body: serde_json::Value, now_secs: i64) -> SignUpOutcome {
    if body.get("access_token").is_some() {
        if let Ok(s) = serde_json::from_value::<Session>(body) {
            return SignUpOutcome::SignedIn(s.stamped(now_secs));
        }
    }
    SignUpOutcome::ConfirmationSent
}

/// Storage answers `{"Key": "<bucket>/<key>"}`; hand back the key within the bucket.
pub(crate) fn stored_key(bucket: &str, requested: &str, reported: Option<&str>) -> String {
    let Some(reported) = reported.filter(|k| !k.trim().is_empty()) else {
        return requested.to_string();
    };
    reported
        .strip_prefix(bucket)
        .and_then(|k| k.strip_prefix('/'))
        .unwrap_or(reported)
        .to_string()
}

#[async_trait(?Send)]
impl Backend for SupabaseClient {
    async fn select(&self, query: &Query) -> ApiResult<Vec<serde_json::Value>> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .get(self.config.rest_url(&query.table))
                .query(&query.to_pairs()),
        );
        let res = Self::send(req, ApiErrorKind::Http).await?;
        res.json().await.map_err(ApiError::parse)
    }

    async fn insert(&self, table: &str, row: serde_json::Value) -> ApiResult<()> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .post(self.config.rest_url(table))
                .header("Prefer", "return=minimal")
                .json(&row),
        );
        Self::send(req, ApiErrorKind::Http).await.map(|_| ())
    }

    async fn upsert(&self, table: &str, row: serde_json::Value, on_conflict: &[&str]) -> ApiResult<()> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .post(self.config.rest_url(table))
                .query(&[("on_conflict", on_conflict.join(","))])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&row),
        );
        Self::send(req, ApiErrorKind::Http).await.map(|_| ())
    }

    async fn update(&self, table: &str, patch: serde_json::Value, filters: &[Filter]) -> ApiResult<()> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .patch(self.config.rest_url(table))
                .query(&filter_pairs(filters))
                .header("Prefer", "return=minimal")
                .json(&patch),
        );
        Self::send(req, ApiErrorKind::Http).await.map(|_| ())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> ApiResult<()> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .delete(self.config.rest_url(table))
                .query(&filter_pairs(filters)),
        );
        Self::send(req, ApiErrorKind::Http).await.map(|_| ())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<String> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .post(self.config.object_url(bucket, key))
                .header("Content-Type", content_type)
                .header("x-upsert", "false")
                .body(bytes),
        );
        let res = Self::send(req, ApiErrorKind::Storage).await?;
        let body: UploadResponse = res.json().await.map_err(ApiError::parse)?;
        Ok(stored_key(bucket, key, body.key.as_deref()))
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> ApiResult<()> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .delete(format!("{}/storage/v1/object/{}", self.config.supabase_url, bucket))
                .json(&serde_json::json!({ "prefixes": [key] })),
        );
        Self::send(req, ApiErrorKind::Storage).await.map(|_| ())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.config.public_object_url(bucket, key)
    }

    async fn rpc(&self, name: &str, args: serde_json::Value) -> ApiResult<serde_json::Value> {
        let req = self.with_auth_headers(
            reqwest::Client::new()
                .post(self.config.rpc_url(name))
                .json(&args),
        );
        let res = Self::send(req, ApiErrorKind::Http).await?;
        Self::read_json_or_null(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_session;

    fn client(session: Option<Session>) -> SupabaseClient {
        SupabaseClient::new(
            EnvConfig::new("https://abc.supabase.co", "anon-key"),
            SessionHub::new(session),
        )
    }

    #[test]
    fn anonymous_requests_use_anon_key() {
        assert_eq!(client(None).bearer(), "anon-key");
    }

    #[test]
    fn signed_in_requests_use_access_token() {
        let c = client(Some(test_session("u1")));
        assert_eq!(c.bearer(), "token-u1");

        // Clones share the hub, so signing out is seen everywhere.
        let other = c.clone();
        c.sessions.publish(AuthEvent::SignedOut, None);
        assert_eq!(other.bearer(), "anon-key");
    }

    #[test]
    fn sign_up_with_session_signs_in() {
        let body = serde_json::json!({
            "access_token": "jwt",
            "refresh_token": "r",
            "expires_in": 60,
            "user": {"id": "u1", "email": "a@b.co"}
        });
        match parse_sign_up(body, 100) {
            SignUpOutcome::SignedIn(s) => {
                assert_eq!(s.user.id, "u1");
                assert_eq!(s.expires_at, Some(160));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn sign_up_without_session_needs_confirmation() {
        let body = serde_json::json!({"id": "u1", "email": "a@b.co", "confirmation_sent_at": "2025-01-01T00:00:00Z"});
        assert_eq!(parse_sign_up(body, 0), SignUpOutcome::ConfirmationSent);
        assert_eq!(parse_sign_up(serde_json::Value::Null, 0), SignUpOutcome::ConfirmationSent);
    }

    #[test]
    fn stored_key_strips_bucket_prefix() {
        assert_eq!(stored_key("notes", "u1/1.pdf", Some("notes/u1/1.pdf")), "u1/1.pdf");
        assert_eq!(stored_key("notes", "u1/1.pdf", None), "u1/1.pdf");
        assert_eq!(stored_key("notes", "u1/1.pdf", Some("other/u1/1.pdf")), "other/u1/1.pdf");
    }
}
