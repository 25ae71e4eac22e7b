//! Admin report queue: role gate, report listing and the two moderator actions.

use super::{require_viewer, FlowResult};
use crate::api::{fetch_all, Backend, Direction, Filter, Query};
use crate::models::{NoteStatus, Report, UserRole};
use serde_json::json;
use std::collections::HashSet;

const REPORT_WITH_CONTEXT: &str = "*,
    notes ( topic, subject, status, uploader_id ),
    profiles:reporter_id ( full_name, email )";

/// Proof that the viewer's roles include `admin` or `moderator`. Only
/// [`load_moderation`] hands one out, and the mutating actions require it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Moderator {
    user_id: String,
}

impl Moderator {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum ModerationAccess {
    Denied,
    Granted {
        moderator: Moderator,
        reports: Vec<Report>,
    },
}

pub(crate) async fn fetch_roles<B: Backend + ?Sized>(
    backend: &B,
    user_id: &str,
) -> FlowResult<Vec<UserRole>> {
    let q = Query::from("user_roles").select("role").eq("user_id", user_id);
    Ok(fetch_all(backend, &q).await?)
}

/// Check the viewer's roles, then fetch every report newest first. Denied
/// viewers never trigger the reports read.
pub(crate) async fn load_moderation<B: Backend + ?Sized>(
    backend: &B,
    viewer: Option<&str>,
) -> FlowResult<ModerationAccess> {
    let user_id = require_viewer(viewer)?;
    let roles = fetch_roles(backend, user_id).await?;
    if !roles.iter().any(|r| r.role.can_moderate()) {
        tracing::info!(user_id, "moderation access denied");
        return Ok(ModerationAccess::Denied);
    }

    let moderator = Moderator {
        user_id: user_id.to_string(),
    };
    let reports = fetch_reports(backend, &moderator).await?;
    Ok(ModerationAccess::Granted { moderator, reports })
}

pub(crate) async fn fetch_reports<B: Backend + ?Sized>(
    backend: &B,
    _moderator: &Moderator,
) -> FlowResult<Vec<Report>> {
    let q = Query::from("reports")
        .select(REPORT_WITH_CONTEXT)
        .order("created_at", Direction::Desc);
    Ok(fetch_all(backend, &q).await?)
}

pub(crate) async fn set_note_status<B: Backend + ?Sized>(
    backend: &B,
    moderator: &Moderator,
    note_id: &str,
    status: NoteStatus,
) -> FlowResult<()> {
    backend
        .update(
            "notes",
            json!({ "status": status }),
            &[Filter::Eq("id".to_string(), note_id.to_string())],
        )
        .await?;
    tracing::info!(moderator = moderator.user_id(), note_id, %status, "note status changed");
    Ok(())
}

pub(crate) async fn dismiss_report<B: Backend + ?Sized>(
    backend: &B,
    moderator: &Moderator,
    report_id: &str,
) -> FlowResult<()> {
    backend
        .delete(
            "reports",
            &[Filter::Eq("id".to_string(), report_id.to_string())],
        )
        .await?;
    tracing::info!(moderator = moderator.user_id(), report_id, "report dismissed");
    Ok(())
}

/// Local copy of the report list plus the rows with a request in flight.
/// Changes are applied only after the server confirms them.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReportBoard {
    pub reports: Vec<Report>,
    busy: HashSet<String>,
}

impl ReportBoard {
    pub fn new(reports: Vec<Report>) -> Self {
        Self {
            reports,
            busy: HashSet::new(),
        }
    }

    /// Mark a row busy. `false` if it already was; the caller should not send again.
    pub fn begin(&mut self, report_id: &str) -> bool {
        self.busy.insert(report_id.to_string())
    }

    pub fn finish(&mut self, report_id: &str) {
        self.busy.remove(report_id);
    }

    pub fn is_busy(&self, report_id: &str) -> bool {
        self.busy.contains(report_id)
    }

    /// Every report on the note shows the new status.
    pub fn apply_status(&mut self, note_id: &str, status: NoteStatus) {
        for r in self.reports.iter_mut().filter(|r| r.note_id == note_id) {
            if let Some(n) = r.notes.as_mut() {
                n.status = status;
            }
        }
    }

    pub fn remove(&mut self, report_id: &str) {
        self.reports.retain(|r| r.id != report_id);
        self.busy.remove(report_id);
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
