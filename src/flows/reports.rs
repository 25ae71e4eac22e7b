use super::{require_viewer, FlowError, FlowResult};
use crate::api::Backend;
use crate::validation::validate_report_reason;
use serde_json::json;

/// File a report against a note. One report per (reporter, note); a repeat is
/// [`FlowError::AlreadyReported`].
pub(crate) async fn submit_report<B: Backend + ?Sized>(
    backend: &B,
    viewer: Option<&str>,
    note_id: &str,
    reason: &str,
) -> FlowResult<()> {
    let reporter_id = require_viewer(viewer)?;
    let reason = validate_report_reason(reason)?;

    let row = json!({
        "note_id": note_id,
        "reporter_id": reporter_id,
        "reason": reason,
    });
    match backend.insert("reports", row).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_unique_violation() => Err(FlowError::AlreadyReported),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::api::{ApiError, ApiErrorKind};
    use crate::validation::ValidationError;
    use futures::executor::block_on;

    const REASON: &str = "Wrong syllabus, this is semester 4 material";

    fn backend() -> MockBackend {
        MockBackend::new().with_unique("reports", &["reporter_id", "note_id"])
    }

    #[test]
    fn report_is_stored_with_trimmed_reason() {
        let b = backend();
        block_on(submit_report(&b, Some("u1"), "n1", &format!("  {REASON}\n"))).unwrap();
        let rows = b.rows("reports");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["reason"], REASON);
        assert_eq!(rows[0]["reporter_id"], "u1");
    }

    #[test]
    fn duplicate_report_is_distinguishable() {
        let b = backend();
        block_on(submit_report(&b, Some("u1"), "n1", REASON)).unwrap();
        let err = block_on(submit_report(&b, Some("u1"), "n1", REASON)).unwrap_err();
        assert_eq!(err, FlowError::AlreadyReported);
        assert_eq!(err.user_message(), "You have already reported this note");
        assert_eq!(b.rows("reports").len(), 1);
    }

    #[test]
    fn other_failures_keep_backend_message() {
        let b = MockBackend::new().fail_on(
            "insert",
            "reports",
            ApiError::new(ApiErrorKind::Network, "Failed to fetch"),
        );
        let err = block_on(submit_report(&b, Some("u1"), "n1", REASON)).unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch");
    }

    #[test]
    fn short_reason_never_sent() {
        let b = backend();
        let err = block_on(submit_report(&b, Some("u1"), "n1", "bad")).unwrap_err();
        assert_eq!(err, FlowError::Validation(ValidationError::ReasonTooShort));
        let err = block_on(submit_report(&b, Some("u1"), "n1", "   ")).unwrap_err();
        assert_eq!(err, FlowError::Validation(ValidationError::ReasonRequired));
        assert_eq!(b.call_count(), 0);
    }

    #[test]
    fn anonymous_report_requires_login() {
        let b = backend();
        let err = block_on(submit_report(&b, None, "n1", REASON)).unwrap_err();
        assert!(err.needs_login());
        assert_eq!(b.call_count(), 0);
    }
}
