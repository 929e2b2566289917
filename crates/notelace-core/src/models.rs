//! Wire data model for the notebook API.
//!
//! Field names and shapes follow the server's JSON exactly (snake_case,
//! Mongo-style `_id` keys). Parsing is strict at the transport boundary:
//! a 2xx body missing a required scalar field fails deserialization and is
//! classified as a malformed response rather than silently defaulting.
//! List fields (`notes`, `access_list`, `tags`, `likes`) default to empty
//! because the server itself backfills them for older documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level granted to a user on a shared notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access.
    View,
    /// Read and write access. Edit implies view.
    Edit,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            _ => Err(format!("Invalid permission: {}", s)),
        }
    }
}

/// One entry in a notebook's access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    /// Email of the user the grant applies to.
    pub user_email: String,
    /// Granted permission level.
    pub permission: Permission,
}

/// A single note inside a notebook.
///
/// Notes have no lifecycle of their own; they live and die with their
/// parent notebook's note collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned opaque identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Note body text.
    pub content: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

/// A notebook with its embedded notes and sharing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Server-assigned opaque identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email of the owning user. The owner never appears in `access_list`.
    pub owner_email: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Embedded notes. Empty in list responses, populated in detail
    /// responses.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Sharing grants, in server order. Order matters for permission
    /// resolution when duplicates exist.
    #[serde(default)]
    pub access_list: Vec<AccessEntry>,
    /// Whether the notebook is visible in public discovery.
    #[serde(default)]
    pub is_public: bool,
    /// Case-sensitive tags, deduplicated and sorted on every save.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Emails of users who liked this notebook.
    #[serde(default)]
    pub likes: Vec<String>,
}

impl Notebook {
    /// Whether `viewer` has already liked this notebook.
    pub fn liked_by(&self, viewer: &str) -> bool {
        self.likes.iter().any(|e| e == viewer)
    }
}

/// Request body for creating a notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookCreate {
    pub name: String,
}

/// Request body for creating or editing a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreate {
    pub content: String,
}

/// Request body for replacing a notebook's tag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsUpdate {
    pub tags: Vec<String>,
}

/// Request body for toggling public visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityUpdate {
    pub is_public: bool,
}

/// Request body for granting a user access to a notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRequest {
    pub recipient_email: String,
    pub permission: Permission,
}

/// One multiple-choice question from a generated quiz.
///
/// All three fields are required; a payload with any question missing one
/// fails deserialization, which invalidates the whole quiz set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub question: String,
    /// Candidate answers, order-preserving.
    pub options: Vec<String>,
    /// Exact text of the correct option.
    pub correct_answer: String,
}

/// Quiz payload as returned by the quiz generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizPayload {
    pub questions: Vec<QuizQuestion>,
}

/// Response from the image text-extraction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Echo of the uploaded filename.
    pub filename: String,
    /// Raw text recognized in the image.
    pub extracted_text: String,
}

/// Response from the summarization endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Condensed study-note summary of the input text.
    pub summary: String,
}

/// Error body shape used by the server for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDetail {
    pub detail: String,
}
