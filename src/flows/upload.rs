use super::{require_viewer, FlowResult};
use crate::api::{ApiError, Backend};
use crate::validation::{validate_upload, UploadDraft};
use serde_json::json;

pub(crate) const AWARD_UPLOAD_POINTS: &str = "award_upload_points";

#[derive(Debug)]
pub(crate) struct UploadReceipt {
    pub object_key: String,
    pub file_url: String,
    /// Set when the note is stored but the point award call failed.
    pub award_error: Option<ApiError>,
}

/// `{user}/{millis}.{ext}`; one namespace per uploader.
pub(crate) fn object_key(user_id: &str, now_ms: i64, extension: &str) -> String {
    format!("{user_id}/{now_ms}.{extension}")
}

/// Validate, store the file, insert the note row, then award points.
///
/// A failed insert removes the stored object before the insert error is
/// returned. A failed cleanup is logged only.
pub(crate) async fn submit_upload<B: Backend + ?Sized>(
    backend: &B,
    bucket: &str,
    viewer: Option<&str>,
    draft: &UploadDraft,
    now_ms: i64,
) -> FlowResult<UploadReceipt> {
    let upload = validate_upload(draft)?;
    let user_id = require_viewer(viewer)?;

    let key = object_key(user_id, now_ms, &upload.file.extension());
    let mime = upload.file.mime.clone();
    let stored = backend
        .upload_object(bucket, &key, upload.file.bytes, &mime)
        .await?;
    let file_url = backend.public_url(bucket, &stored);

    let row = json!({
        "uploader_id": user_id,
        "semester": upload.semester,
        "subject": upload.subject,
        "topic": upload.topic,
        "file_url": file_url,
        "file_type": mime,
        "tags": upload.tags,
    });

    if let Err(insert_err) = backend.insert("notes", row).await {
        tracing::warn!(key = %stored, error = %insert_err, "note insert failed, removing stored file");
        if let Err(cleanup_err) = backend.remove_object(bucket, &stored).await {
            tracing::error!(key = %stored, error = %cleanup_err, "orphaned upload could not be removed");
        }
        return Err(insert_err.into());
    }

    let award_error = backend
        .rpc(AWARD_UPLOAD_POINTS, json!({ "_user_id": user_id }))
        .await
        .err();
    if let Some(e) = &award_error {
        tracing::warn!(user_id, error = %e, "upload points not awarded");
    }

    Ok(UploadReceipt {
        object_key: stored,
        file_url,
        award_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockBackend};
    use crate::api::ApiErrorKind;
    use crate::flows::FlowError;
    use crate::validation::{PickedFile, ValidationError};
    use futures::executor::block_on;

    fn draft() -> UploadDraft {
        UploadDraft {
            semester: "3".to_string(),
            subject: " Data Structures ".to_string(),
            topic: "AVL trees".to_string(),
            tags: "trees, balancing".to_string(),
            file: Some(PickedFile {
                name: "avl.pdf".to_string(),
                mime: "application/pdf".to_string(),
                size: 4,
                bytes: b"%PDF".to_vec(),
            }),
        }
    }

    #[test]
    fn happy_path_stores_inserts_and_awards() {
        let backend = MockBackend::new();
        let receipt = block_on(submit_upload(&backend, "notes", Some("u1"), &draft(), 1_700_000_000_000)).unwrap();

        assert_eq!(receipt.object_key, "u1/1700000000000.pdf");
        assert_eq!(receipt.file_url, "https://cdn.test/notes/u1/1700000000000.pdf");
        assert!(receipt.award_error.is_none());
        assert_eq!(
            backend.calls(),
            vec![
                Call::Upload("u1/1700000000000.pdf".to_string()),
                Call::Insert("notes".to_string()),
                Call::Rpc(AWARD_UPLOAD_POINTS.to_string()),
            ]
        );

        let rows = backend.rows("notes");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["subject"], "Data Structures");
        assert_eq!(rows[0]["semester"], 3);
        assert_eq!(rows[0]["tags"], json!(["trees", "balancing"]));
        assert_eq!(rows[0]["file_type"], "application/pdf");
    }

    #[test]
    fn invalid_drafts_never_reach_the_backend() {
        let mut cases = Vec::new();

        let mut d = draft();
        d.semester = "9".to_string();
        cases.push(d);

        let mut d = draft();
        d.subject = "  ".to_string();
        cases.push(d);

        let mut d = draft();
        d.topic = "t".repeat(201);
        cases.push(d);

        let mut d = draft();
        d.tags = "x".repeat(501);
        cases.push(d);

        let mut d = draft();
        if let Some(f) = d.file.as_mut() {
            f.size = 10 * 1024 * 1024 + 1;
        }
        cases.push(d);

        let mut d = draft();
        if let Some(f) = d.file.as_mut() {
            f.mime = "application/zip".to_string();
        }
        cases.push(d);

        for d in cases {
            let backend = MockBackend::new();
            let res = block_on(submit_upload(&backend, "notes", Some("u1"), &d, 1));
            assert!(matches!(res, Err(FlowError::Validation(_))), "{res:?}");
            assert_eq!(backend.call_count(), 0);
        }
    }

    #[test]
    fn validation_is_reported_before_login() {
        let backend = MockBackend::new();
        let mut d = draft();
        d.semester = "0".to_string();
        let res = block_on(submit_upload(&backend, "notes", None, &d, 1));
        assert_eq!(res.unwrap_err(), FlowError::Validation(ValidationError::SemesterTooLow));
    }

    #[test]
    fn anonymous_upload_requires_login() {
        let backend = MockBackend::new();
        let res = block_on(submit_upload(&backend, "notes", None, &draft(), 1));
        assert_eq!(res.unwrap_err(), FlowError::AuthRequired);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn failed_insert_removes_the_stored_file() {
        let backend = MockBackend::new().fail_on(
            "insert",
            "notes",
            ApiError::new(ApiErrorKind::Http, "new row violates row-level security policy"),
        );
        let res = block_on(submit_upload(&backend, "notes", Some("u1"), &draft(), 5));

        assert_eq!(
            res.unwrap_err().user_message(),
            "new row violates row-level security policy"
        );
        assert!(backend.object_keys().is_empty());
        assert_eq!(backend.calls().last(), Some(&Call::RemoveObject("u1/5.pdf".to_string())));
        assert!(!backend.calls().contains(&Call::Rpc(AWARD_UPLOAD_POINTS.to_string())));
    }

    #[test]
    fn failed_storage_stops_before_insert() {
        let backend = MockBackend::new().fail_on(
            "upload",
            "notes",
            ApiError::new(ApiErrorKind::Storage, "The resource already exists"),
        );
        let res = block_on(submit_upload(&backend, "notes", Some("u1"), &draft(), 5));
        assert!(matches!(res, Err(FlowError::Backend(_))));
        assert!(backend.rows("notes").is_empty());
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn award_failure_keeps_the_note() {
        let backend = MockBackend::new().fail_on(
            "rpc",
            AWARD_UPLOAD_POINTS,
            ApiError::new(ApiErrorKind::Http, "function award_upload_points does not exist"),
        );
        let receipt = block_on(submit_upload(&backend, "notes", Some("u1"), &draft(), 5)).unwrap();
        assert_eq!(backend.rows("notes").len(), 1);
        assert_eq!(backend.object_keys(), vec!["u1/5.pdf".to_string()]);
        assert!(receipt.award_error.is_some());
    }
}
