use rusqlite::params;

use crate::{
    ctx::BaseParams,
    identity::normalize_email,
    notes::{self, CreateNote, FindNotesResponse, Note},
    Error, Result,
};

use super::VerifyTransactionResponse;

const COLUMNS: &str = "id, title, content, author_kind, author_identity, author_name, \
    created_at, updated_at, blockchain_tx_hash, blockchain_note_id, is_blockchain_note";

/// Like the plain create, but the transaction hash is mandatory and the
/// note is flagged as chain-backed.
pub async fn store_blockchain_note(args: CreateNote, base: BaseParams) -> Result<Note> {
    let has_tx_hash = args
        .blockchain_tx_hash
        .as_deref()
        .is_some_and(|hash| !hash.trim().is_empty());

    if !has_tx_hash {
        return Err(Error::BadRequest("Blockchain transaction hash is required".into()));
    }

    notes::insert_note(args, true, base).await
}

pub async fn find_user_blockchain_notes(email: String, BaseParams { db, .. }: BaseParams) -> Result<FindNotesResponse> {
    let email = normalize_email(&email);

    db.call(move |conn| {
        let notes = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM notes \
                WHERE is_blockchain_note AND author_kind = 'email' AND author_identity = ? \
                ORDER BY id"
            ))?
            .query_map(params![email], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(FindNotesResponse { results: notes })
    })
    .await
    .map_err(Error::from)
}

/// Stub verification: a lookup against local storage, never a chain query.
/// "Verified" only means some stored note carries this hash.
pub async fn verify_transaction(tx_hash: String, BaseParams { db, .. }: BaseParams) -> Result<VerifyTransactionResponse> {
    let hash = tx_hash.clone();

    let notes = db
        .call(move |conn| {
            let notes = conn
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM notes WHERE blockchain_tx_hash = ? ORDER BY id"
                ))?
                .query_map(params![hash], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(notes)
        })
        .await
        .map_err(Error::from)?;

    if notes.is_empty() {
        return Err(Error::NotFound("No notes found for transaction".into()));
    }

    Ok(VerifyTransactionResponse {
        verified: true,
        transaction_hash: tx_hash,
        note_count: notes.len(),
        notes,
    })
}
