use rusqlite::{params, Row};
use uuid::Uuid;

use crate::{
    ctx::BaseParams,
    identity::{self, AuthorIdentity},
    Error, Result,
};

use super::ownership::{self, Decision, Operation};
use super::{CreateNote, FindNotesResponse, Note, NotesQuery, UpdateNote};

const COLUMNS: &str = "id, title, content, author_kind, author_identity, author_name, \
    created_at, updated_at, blockchain_tx_hash, blockchain_note_id, is_blockchain_note";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        let kind: String = row.get(3)?;
        let value: String = row.get(4)?;
        let author = AuthorIdentity::from_parts(&kind, value).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, "author_kind".into(), rusqlite::types::Type::Text)
        })?;

        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author,
            author_name: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            blockchain_tx_hash: row.get(8)?,
            blockchain_note_id: row.get(9)?,
            is_blockchain_note: row.get(10)?,
        })
    }
}

pub async fn create_note(args: CreateNote, base: BaseParams) -> Result<Note> {
    insert_note(args, false, base).await
}

/// Shared by the plain and blockchain create endpoints. Normalizes the
/// author identity and falls back to the email local-part as display name.
pub(crate) async fn insert_note(args: CreateNote, is_blockchain_note: bool, BaseParams { db, .. }: BaseParams) -> Result<Note> {
    let author = AuthorIdentity::parse(&args.author)
        .ok_or_else(|| Error::BadRequest("Author identity is required".into()))?;

    let author_name = args
        .author_name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| match &author {
            AuthorIdentity::Email(_) => Some(identity::derive_name(&args.author)),
            AuthorIdentity::Wallet(_) => None,
        });

    let CreateNote {
        title,
        content,
        blockchain_tx_hash,
        blockchain_note_id,
        ..
    } = args;

    db.call(move |conn| {
        conn.query_row(
            &format!(
                r#"INSERT INTO notes
                (title, content, author_kind, author_identity, author_name, blockchain_tx_hash, blockchain_note_id, is_blockchain_note)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING {COLUMNS}"#
            ),
            params![
                title,
                content,
                author.kind(),
                author.as_str(),
                author_name,
                blockchain_tx_hash,
                blockchain_note_id,
                is_blockchain_note,
            ],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(Error::from)
}

pub async fn find_notes(NotesQuery { author }: NotesQuery, BaseParams { db, .. }: BaseParams) -> Result<FindNotesResponse> {
    let filter = match author {
        Some(raw) => Some(
            AuthorIdentity::parse(&raw).ok_or_else(|| Error::BadRequest("Author filter must not be blank".into()))?,
        ),
        None => None,
    };

    db.call(move |conn| {
        // uuid7 primary keys order by creation time, so this is stable
        // insertion order.
        let notes = match filter {
            Some(author) => conn
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM notes WHERE author_kind = ? AND author_identity = ? ORDER BY id"
                ))?
                .query_map(params![author.kind(), author.as_str()], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?,
            None => conn
                .prepare(&format!("SELECT {COLUMNS} FROM notes ORDER BY id"))?
                .query_map([], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };
        Ok(FindNotesResponse { results: notes })
    })
    .await
    .map_err(Error::from)
}

pub async fn get_note(note_id: Uuid, BaseParams { db, .. }: BaseParams) -> Result<Note> {
    db.call(move |conn| {
        let note = conn.query_row(
            &format!("SELECT {COLUMNS} FROM notes WHERE id = ?"),
            params![note_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn update_note(
    note_id: Uuid,
    UpdateNote { title, content }: UpdateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let actor = ctx.actor;

    db.call(move |conn| {
        let note = conn.query_row(
            &format!("SELECT {COLUMNS} FROM notes WHERE id = ?"),
            params![note_id],
            |row| Note::try_from(row),
        )?;

        if let Decision::Deny(reason) = ownership::authorize(&note.author, actor.as_ref(), Operation::Update) {
            return Err(Error::from(reason).into());
        }

        conn.query_row(
            &format!(
                r#"UPDATE notes SET title = coalesce(?, title), content = coalesce(?, content), updated_at = ?
                WHERE id = ?
                RETURNING {COLUMNS}"#
            ),
            params![title, content, chrono::Utc::now(), note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}

pub async fn delete_note(note_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<()> {
    let actor = ctx.actor;

    db.call(move |conn| {
        let note = conn.query_row(
            &format!("SELECT {COLUMNS} FROM notes WHERE id = ?"),
            params![note_id],
            |row| Note::try_from(row),
        )?;

        if let Decision::Deny(reason) = ownership::authorize(&note.author, actor.as_ref(), Operation::Delete) {
            return Err(Error::from(reason).into());
        }

        conn.execute("DELETE FROM notes WHERE id = ?", params![note_id])?;
        Ok(())
    })
    .await
    .map_err(Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
}
