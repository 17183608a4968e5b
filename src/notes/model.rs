use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::AuthorIdentity;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub author: AuthorIdentity,
    pub author_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub blockchain_tx_hash: Option<String>,
    pub blockchain_note_id: Option<i64>,
    pub is_blockchain_note: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNote {
    #[schemars(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[schemars(length(min = 1))]
    pub content: String,
    /// Email address or wallet address of the author.
    pub author: String,
    /// Optional display name; derived from the email local-part when absent.
    pub author_name: Option<String>,
    pub blockchain_tx_hash: Option<String>,
    pub blockchain_note_id: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateNote {
    #[schemars(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[schemars(length(min = 1))]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NotesQuery {
    /// Restrict results to one author identity.
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindNotesResponse {
    pub results: Vec<Note>,
}
