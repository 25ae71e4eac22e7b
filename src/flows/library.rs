use super::{require_viewer, FlowResult};
use crate::api::{fetch_all, Backend, Direction, Filter, Query};
use crate::models::{SavedNote, SavedNoteSummary, UploaderSummary};
use std::collections::{BTreeSet, HashMap};

const SAVED_WITH_NOTE: &str = "id, note_id, created_at,
    notes ( id, topic, subject, semester, trust_score, file_type, uploader_id )";

/// A bookmark with its uploader resolved. `note` is `None` when the note row
/// is gone or hidden; the page shows it as unavailable.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LibraryEntry {
    pub id: String,
    pub note_id: String,
    pub saved_at: String,
    pub note: Option<SavedNoteSummary>,
    pub uploader: UploaderSummary,
}

/// Join uploader profiles onto bookmarks. Unknown uploaders get the placeholder.
pub(crate) fn join_uploaders(saved: Vec<SavedNote>, profiles: Vec<UploaderSummary>) -> Vec<LibraryEntry> {
    let by_id: HashMap<String, UploaderSummary> = profiles
        .into_iter()
        .filter_map(|p| p.id.clone().map(|id| (id, p)))
        .collect();

    saved
        .into_iter()
        .map(|s| {
            let uploader = s
                .notes
                .as_ref()
                .and_then(|n| n.uploader_id.as_ref())
                .and_then(|id| by_id.get(id))
                .cloned()
                .unwrap_or_else(UploaderSummary::placeholder);
            LibraryEntry {
                id: s.id,
                note_id: s.note_id,
                saved_at: s.created_at,
                note: s.notes,
                uploader,
            }
        })
        .collect()
}

/// Bookmarks first, then one profile read for all their uploaders. A failed
/// profile read degrades to placeholders rather than failing the page.
pub(crate) async fn load_library<B: Backend + ?Sized>(
    backend: &B,
    viewer: Option<&str>,
) -> FlowResult<Vec<LibraryEntry>> {
    let user_id = require_viewer(viewer)?;
    let q = Query::from("saved_notes")
        .select(SAVED_WITH_NOTE)
        .eq("user_id", user_id)
        .order("created_at", Direction::Desc);
    let saved: Vec<SavedNote> = fetch_all(backend, &q).await?;

    let uploader_ids: BTreeSet<&str> = saved
        .iter()
        .filter_map(|s| s.notes.as_ref()?.uploader_id.as_deref())
        .collect();
    if uploader_ids.is_empty() {
        return Ok(join_uploaders(saved, Vec::new()));
    }

    let pq = Query::from("profiles")
        .select("id, full_name, reputation_level")
        .is_in("id", uploader_ids.iter().copied());
    let profiles = match fetch_all(backend, &pq).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "uploader profiles unavailable, using placeholders");
            Vec::new()
        }
    };
    Ok(join_uploaders(saved, profiles))
}

pub(crate) async fn remove_bookmark<B: Backend + ?Sized>(backend: &B, saved_id: &str) -> FlowResult<()> {
    backend
        .delete(
            "saved_notes",
            &[Filter::Eq("id".to_string(), saved_id.to_string())],
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::api::{ApiError, ApiErrorKind};
    use crate::models::ReputationLevel;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    fn saved(id: &str, user: &str, uploader: Option<&str>, created_at: &str) -> Value {
        let notes = uploader.map(|u| {
            json!({
                "id": format!("note-{id}"),
                "topic": "Sorting",
                "subject": "DSA",
                "semester": 3,
                "trust_score": 61.5,
                "file_type": "application/pdf",
                "uploader_id": u,
            })
        });
        json!({
            "id": id,
            "user_id": user,
            "note_id": format!("note-{id}"),
            "created_at": created_at,
            "notes": notes,
        })
    }

    fn backend() -> MockBackend {
        MockBackend::new()
            .with_rows(
                "saved_notes",
                vec![
                    saved("s1", "me", Some("ravi"), "2025-01-01T00:00:00+00:00"),
                    saved("s2", "me", Some("ghost"), "2025-01-02T00:00:00+00:00"),
                    saved("s3", "me", None, "2025-01-03T00:00:00+00:00"),
                    saved("s4", "other", Some("ravi"), "2025-01-04T00:00:00+00:00"),
                ],
            )
            .with_rows(
                "profiles",
                vec![json!({ "id": "ravi", "full_name": "Ravi K", "reputation_level": "Legend" })],
            )
    }

    #[test]
    fn missing_profiles_become_placeholders() {
        let b = backend();
        let entries = block_on(load_library(&b, Some("me"))).unwrap();

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s2", "s1"]);

        assert_eq!(entries[2].uploader.full_name, "Ravi K");
        assert_eq!(entries[2].uploader.reputation_level, ReputationLevel::Legend);

        assert_eq!(entries[1].uploader.full_name, "Unknown");
        assert_eq!(entries[1].uploader.reputation_level, ReputationLevel::Newbie);

        assert!(entries[0].note.is_none());
        assert_eq!(b.selects_of("profiles"), 1);
    }

    #[test]
    fn profile_failure_does_not_fail_the_page() {
        let b = backend().fail_on(
            "select",
            "profiles",
            ApiError::new(ApiErrorKind::Http, "permission denied for table profiles"),
        );
        let entries = block_on(load_library(&b, Some("me"))).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.uploader == UploaderSummary::placeholder()));
    }

    #[test]
    fn empty_library_skips_profile_lookup() {
        let b = backend();
        let entries = block_on(load_library(&b, Some("nobody"))).unwrap();
        assert!(entries.is_empty());
        assert_eq!(b.selects_of("profiles"), 0);
    }

    #[test]
    fn bookmark_fetch_failure_is_an_error() {
        let b = backend().fail_on(
            "select",
            "saved_notes",
            ApiError::new(ApiErrorKind::Network, "Failed to fetch"),
        );
        assert!(block_on(load_library(&b, Some("me"))).is_err());
    }

    #[test]
    fn remove_deletes_one_bookmark() {
        let b = backend();
        block_on(remove_bookmark(&b, "s2")).unwrap();
        let left: Vec<_> = b.rows("saved_notes").iter().map(|r| r["id"].clone()).collect();
        assert_eq!(left, vec![json!("s1"), json!("s3"), json!("s4")]);
    }
}
