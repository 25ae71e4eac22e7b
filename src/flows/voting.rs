use super::{require_viewer, FlowResult};
use crate::api::{fetch_optional, Backend, Filter, Query};
use crate::models::{Vote, VoteType};
use serde_json::json;

/// What a vote click does given the viewer's current vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VoteAction {
    /// Same type clicked again: back to no vote.
    Retract,
    /// No vote yet, or switching sides.
    Cast(VoteType),
}

pub(crate) fn plan_vote(current: Option<VoteType>, clicked: VoteType) -> VoteAction {
    if current == Some(clicked) {
        VoteAction::Retract
    } else {
        VoteAction::Cast(clicked)
    }
}

impl VoteAction {
    pub fn next_state(self) -> Option<VoteType> {
        match self {
            VoteAction::Retract => None,
            VoteAction::Cast(v) => Some(v),
        }
    }

    pub fn toast(self) -> &'static str {
        match self {
            VoteAction::Retract => "Vote removed",
            VoteAction::Cast(VoteType::Upvote) => "Note upvoted!",
            VoteAction::Cast(VoteType::Downvote) => "Note downvoted!",
        }
    }
}

fn vote_filters(note_id: &str, user_id: &str) -> [Filter; 2] {
    [
        Filter::Eq("note_id".to_string(), note_id.to_string()),
        Filter::Eq("user_id".to_string(), user_id.to_string()),
    ]
}

pub(crate) async fn load_viewer_vote<B: Backend + ?Sized>(
    backend: &B,
    note_id: &str,
    user_id: &str,
) -> FlowResult<Option<VoteType>> {
    let q = Query::from("votes")
        .select("note_id, user_id, vote_type")
        .eq("note_id", note_id)
        .eq("user_id", user_id);
    let vote: Option<Vote> = fetch_optional(backend, q).await?;
    Ok(vote.map(|v| v.vote_type))
}

/// Apply a vote click and return the viewer's new vote state. At most one
/// `votes` row exists per (note, user) afterwards.
pub(crate) async fn cast_vote<B: Backend + ?Sized>(
    backend: &B,
    viewer: Option<&str>,
    note_id: &str,
    current: Option<VoteType>,
    clicked: VoteType,
) -> FlowResult<VoteAction> {
    let user_id = require_viewer(viewer)?;
    let action = plan_vote(current, clicked);

    match action {
        VoteAction::Retract => {
            backend.delete("votes", &vote_filters(note_id, user_id)).await?;
        }
        VoteAction::Cast(vote_type) => {
            let row = json!({
                "note_id": note_id,
                "user_id": user_id,
                "vote_type": vote_type,
            });
            backend.upsert("votes", row, &["note_id", "user_id"]).await?;
        }
    }
    tracing::debug!(note_id, ?action, "vote applied");
    Ok(action)
}
