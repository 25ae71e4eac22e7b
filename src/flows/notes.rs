use super::{require_viewer, FlowError, FlowResult};
use crate::api::{fetch_all, fetch_optional, Backend, Direction, Query};
use crate::models::{Note, NoteStatus};
use crate::validation::{MAX_SEMESTER, MIN_SEMESTER};
use serde_json::json;

const NOTE_WITH_UPLOADER: &str = "*, profiles:uploader_id ( id, full_name, reputation_level )";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BrowseFilter {
    pub semester: Option<u8>,
    pub subject: String,
}

impl BrowseFilter {
    /// Select value `""` means any semester; out-of-range values are ignored.
    pub fn with_semester(mut self, raw: &str) -> Self {
        self.semester = raw
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|s| (MIN_SEMESTER..=MAX_SEMESTER).contains(s));
        self
    }

    pub fn query(&self) -> Query {
        let mut q = Query::from("notes")
            .select(NOTE_WITH_UPLOADER)
            .eq("status", NoteStatus::Approved.as_ref());
        if let Some(s) = self.semester {
            q = q.eq("semester", s.to_string());
        }
        let subject = self.subject.trim();
        if !subject.is_empty() {
            q = q.contains("subject", subject);
        }
        q.order("created_at", Direction::Desc)
    }
}

pub(crate) async fn browse_notes<B: Backend + ?Sized>(
    backend: &B,
    filter: &BrowseFilter,
) -> FlowResult<Vec<Note>> {
    Ok(fetch_all(backend, &filter.query()).await?)
}

pub(crate) async fn load_note<B: Backend + ?Sized>(backend: &B, note_id: &str) -> FlowResult<Note> {
    let q = Query::from("notes").select(NOTE_WITH_UPLOADER).eq("id", note_id);
    fetch_optional(backend, q).await?.ok_or(FlowError::NotFound)
}

/// Bookmark a note for the viewer. A second save of the same note is
/// reported as [`FlowError::AlreadySaved`].
pub(crate) async fn save_note<B: Backend + ?Sized>(
    backend: &B,
    viewer: Option<&str>,
    note_id: &str,
) -> FlowResult<()> {
    let user_id = require_viewer(viewer)?;
    let row = json!({ "user_id": user_id, "note_id": note_id });
    match backend.insert("saved_notes", row).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_unique_violation() => Err(FlowError::AlreadySaved),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use futures::executor::block_on;
    use serde_json::Value;

    fn note(id: &str, semester: u8, subject: &str, status: &str, created_at: &str) -> Value {
        json!({
            "id": id,
            "semester": semester,
            "subject": subject,
            "topic": format!("topic {id}"),
            "file_url": format!("https://cdn.test/notes/{id}.pdf"),
            "file_type": "application/pdf",
            "tags": [],
            "upvotes": 0,
            "downvotes": 0,
            "trust_score": 50,
            "uploader_id": "u1",
            "status": status,
            "created_at": created_at,
            "profiles": null,
        })
    }

    fn library() -> MockBackend {
        MockBackend::new().with_rows(
            "notes",
            vec![
                note("a", 1, "Physics", "approved", "2025-01-01T00:00:00+00:00"),
                note("b", 2, "Data Structures", "approved", "2025-03-01T00:00:00+00:00"),
                note("c", 2, "Physics", "quarantined", "2025-04-01T00:00:00+00:00"),
                note("d", 2, "physics lab", "approved", "2025-02-01T00:00:00+00:00"),
            ],
        )
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn browse_shows_approved_newest_first() {
        let backend = library();
        let notes = block_on(browse_notes(&backend, &BrowseFilter::default())).unwrap();
        assert_eq!(ids(&notes), vec!["b", "d", "a"]);
    }

    #[test]
    fn browse_filters_combine() {
        let backend = library();
        let filter = BrowseFilter {
            subject: "PHYSICS".to_string(),
            ..Default::default()
        }
        .with_semester("2");
        let notes = block_on(browse_notes(&backend, &filter)).unwrap();
        assert_eq!(ids(&notes), vec!["d"]);
    }

    #[test]
    fn multi_word_subject_reaches_the_wire_unquoted() {
        for (subject, expected) in [
            ("Data Structures", "ilike.*Data Structures*"),
            ("  B.Tech ", "ilike.*B.Tech*"),
        ] {
            let filter = BrowseFilter {
                subject: subject.to_string(),
                ..Default::default()
            };
            let pairs = filter.query().to_pairs();
            assert!(
                pairs.contains(&("subject".to_string(), expected.to_string())),
                "{pairs:?}"
            );
        }
    }

    #[test]
    fn semester_select_parsing() {
        assert_eq!(BrowseFilter::default().with_semester("").semester, None);
        assert_eq!(BrowseFilter::default().with_semester("8").semester, Some(8));
        assert_eq!(BrowseFilter::default().with_semester("9").semester, None);
    }

    #[test]
    fn missing_note_is_not_found() {
        let backend = library();
        assert_eq!(block_on(load_note(&backend, "zzz")).unwrap_err(), FlowError::NotFound);
        assert_eq!(block_on(load_note(&backend, "c")).unwrap().status, NoteStatus::Quarantined);
    }

    #[test]
    fn saving_twice_is_already_saved() {
        let backend = MockBackend::new().with_unique("saved_notes", &["user_id", "note_id"]);
        block_on(save_note(&backend, Some("u1"), "a")).unwrap();
        assert_eq!(
            block_on(save_note(&backend, Some("u1"), "a")),
            Err(FlowError::AlreadySaved)
        );
        block_on(save_note(&backend, Some("u2"), "a")).unwrap();
        assert_eq!(backend.rows("saved_notes").len(), 2);
    }
}
