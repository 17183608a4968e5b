use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::notes::Note;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VerifyTransactionResponse {
    pub verified: bool,
    pub transaction_hash: String,
    pub note_count: usize,
    pub notes: Vec<Note>,
}
