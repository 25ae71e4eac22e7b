//! Page-level operations over a [`Backend`](crate::api::Backend).
//!
//! Each flow validates before touching the network and maps backend failures
//! into a [`FlowError`] whose `user_message` is what the page toasts.

pub(crate) mod account;
pub(crate) mod library;
pub(crate) mod moderation;
pub(crate) mod notes;
pub(crate) mod reports;
pub(crate) mod upload;
pub(crate) mod voting;

use crate::api::ApiError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please log in to continue")]
    AuthRequired,
    #[error("You have already reported this note")]
    AlreadyReported,
    #[error("This note is already in your library")]
    AlreadySaved,
    #[error("Note not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] ApiError),
}

pub(crate) type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Backend(e) if e.message.trim().is_empty() => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// The page should send the viewer to `/auth` instead of toasting.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            FlowError::AuthRequired
                | FlowError::Backend(ApiError {
                    kind: crate::api::ApiErrorKind::Unauthorized,
                    ..
                })
        )
    }
}

pub(crate) fn require_viewer(viewer: Option<&str>) -> FlowResult<&str> {
    viewer.filter(|id| !id.is_empty()).ok_or(FlowError::AuthRequired)
}
