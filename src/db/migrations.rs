use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE users (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),

                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,

                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#
        ),
        M::up(
            r#"
            CREATE TABLE notes (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),

                title TEXT CHECK(title IS NULL OR length(title) <= 200),
                content TEXT NOT NULL,

                author_kind TEXT NOT NULL CHECK(author_kind IN ('email', 'wallet')),
                author_identity TEXT NOT NULL,
                author_name TEXT,

                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME,

                blockchain_tx_hash TEXT CHECK(blockchain_tx_hash IS NULL OR length(blockchain_tx_hash) <= 66),
                blockchain_note_id INTEGER,
                is_blockchain_note BOOLEAN NOT NULL DEFAULT 0
            );
        "#
        ),
        M::up("CREATE INDEX idx_notes_author_identity ON notes (author_identity);"),
    ]);
}
