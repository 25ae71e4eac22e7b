use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Moderation state of a note. Only `approved` notes show up in browsing.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum NoteStatus {
    Approved,
    Pending,
    Quarantined,
}

impl NoteStatus {
    pub fn action_label(self) -> &'static str {
        match self {
            NoteStatus::Approved => "Approve",
            NoteStatus::Pending => "Set to Pending",
            NoteStatus::Quarantined => "Quarantine",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            NoteStatus::Approved => "bg-green-500 text-white",
            NoteStatus::Pending => "bg-yellow-500 text-white",
            NoteStatus::Quarantined => "bg-red-500 text-white",
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString,
)]
pub(crate) enum ReputationLevel {
    #[default]
    Newbie,
    Contributor,
    Active,
    #[serde(rename = "Top Contributor")]
    #[strum(serialize = "Top Contributor")]
    TopContributor,
    Legend,
}

impl ReputationLevel {
    pub fn badge_class(self) -> &'static str {
        match self {
            ReputationLevel::Legend => "bg-purple-500 text-white",
            ReputationLevel::TopContributor => "bg-accent text-accent-foreground",
            ReputationLevel::Active => "bg-success text-success-foreground",
            ReputationLevel::Contributor => "bg-primary text-primary-foreground",
            ReputationLevel::Newbie => "bg-muted text-muted-foreground",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum VoteType {
    Upvote,
    Downvote,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    Moderator,
    User,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

/// Uploader fields embedded into note rows (`profiles(...)`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct UploaderSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "unknown_name", deserialize_with = "null_as_unknown")]
    pub full_name: String,
    #[serde(default)]
    pub reputation_level: ReputationLevel,
}

fn null_as_empty<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(de)?.unwrap_or_default())
}

/// Profiles created without sign-up metadata carry `full_name: null`.
fn null_as_unknown<'de, D>(de: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_else(unknown_name))
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

impl UploaderSummary {
    pub fn placeholder() -> Self {
        Self {
            id: None,
            full_name: unknown_name(),
            reputation_level: ReputationLevel::Newbie,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Note {
    pub id: String,
    pub semester: u8,
    pub subject: String,
    pub topic: String,
    pub file_url: String,
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    #[serde(default)]
    pub trust_score: f64,
    pub uploader_id: String,
    pub status: NoteStatus,
    pub created_at: String,

    /// Present when the row was selected with `profiles(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<UploaderSummary>,
}

impl Note {
    pub fn uploader(&self) -> UploaderSummary {
        self.profiles.clone().unwrap_or_else(UploaderSummary::placeholder)
    }

    pub fn is_pdf(&self) -> bool {
        self.file_type.contains("pdf")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Profile {
    pub id: String,
    #[serde(default = "unknown_name", deserialize_with = "null_as_unknown")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reputation_level: ReputationLevel,
    #[serde(default)]
    pub gyan_points: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Vote {
    pub note_id: String,
    pub user_id: String,
    pub vote_type: VoteType,
}

/// Note fields embedded into report rows for the moderation list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ReportedNote {
    pub topic: String,
    pub subject: String,
    pub status: NoteStatus,
    #[serde(default)]
    pub uploader_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ReporterSummary {
    #[serde(default = "unknown_name", deserialize_with = "null_as_unknown")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Report {
    pub id: String,
    pub reason: String,
    pub created_at: String,
    pub reporter_id: String,
    pub note_id: String,
    #[serde(default)]
    pub notes: Option<ReportedNote>,
    #[serde(default)]
    pub profiles: Option<ReporterSummary>,
}

/// Note fields embedded into a bookmark row. The uploader is resolved separately.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct SavedNoteSummary {
    pub id: String,
    pub topic: String,
    pub subject: String,
    pub semester: u8,
    #[serde(default)]
    pub trust_score: f64,
    pub file_type: String,
    #[serde(default)]
    pub uploader_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct SavedNote {
    pub id: String,
    pub note_id: String,
    pub created_at: String,
    #[serde(default)]
    pub notes: Option<SavedNoteSummary>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct UserRole {
    pub role: Role,
}
