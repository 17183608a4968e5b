use crate::{
    ctx::BaseParams,
    notes::{CreateNote, Note},
    openapi::{
        aide::{
            axum::{routing::get, routing::post_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path,
    },
    state::AppState,
};
use axum::http::StatusCode;

use schemars::JsonSchema;
use serde::Deserialize;

use super::handlers;

#[derive(Debug, Deserialize, JsonSchema)]
struct UserEmailPath {
    email: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TxHashPath {
    tx_hash: String,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/blockchain/notes",
            post_with(store_blockchain_note, |t| t.response::<201, Json<Note>>()),
        )
        .api_route("/api/v1/blockchain/notes/user/{email}", get(find_user_blockchain_notes))
        .api_route("/api/v1/blockchain/verify/{tx_hash}", get(verify_transaction))
        .with_state(state)
}

async fn store_blockchain_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::store_blockchain_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn find_user_blockchain_notes(
    Path(UserEmailPath { email }): Path<UserEmailPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::find_user_blockchain_notes(email, base).await.map(Json)
}

async fn verify_transaction(
    Path(TxHashPath { tx_hash }): Path<TxHashPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::verify_transaction(tx_hash, base).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        blockchain::VerifyTransactionResponse,
        db::{init_test_db, DB},
        errors::Result,
        notes::{FindNotesResponse, Note},
    };
    use axum_test::TestServer;
    use serde_json::json;

    const TX_HASH: &str = "0x5c5c9d1b0f7a4a0c8e2f8f1b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d";

    #[tokio::test]
    async fn store_blockchain_note() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/v1/blockchain/notes")
            .json(&json!({
                "title": "on chain",
                "content": "hello",
                "author": "Alice@Example.com",
                "blockchain_tx_hash": TX_HASH,
                "blockchain_note_id": 7
            }))
            .await;

        assert_eq!(response.status_code(), 201);
        let note = response.json::<Note>();
        assert!(note.is_blockchain_note);
        assert_eq!(note.blockchain_tx_hash.as_deref(), Some(TX_HASH));
        assert_eq!(note.blockchain_note_id, Some(7));
        Ok(())
    }

    #[tokio::test]
    async fn store_blockchain_note_requires_tx_hash() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/v1/blockchain/notes")
            .json(&json!({
                "content": "hello",
                "author": "alice@example.com",
                "blockchain_tx_hash": "  "
            }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn find_user_blockchain_notes_filters_by_email_and_flag() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO notes (title, content, author_kind, author_identity, is_blockchain_note, blockchain_tx_hash)
                VALUES ('on chain', '1', 'email', 'alice@example.com', 1, '0xaaa');
                INSERT INTO notes (title, content, author_kind, author_identity)
                VALUES ('off chain', '2', 'email', 'alice@example.com');
                INSERT INTO notes (title, content, author_kind, author_identity, is_blockchain_note, blockchain_tx_hash)
                VALUES ('other author', '3', 'email', 'bob@example.com', 1, '0xbbb');
                "#,
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.get("/api/v1/blockchain/notes/user/ALICE@EXAMPLE.COM").await;

        let notes = response.json::<FindNotesResponse>();
        assert_eq!(notes.results.len(), 1);
        assert_eq!(notes.results[0].title.as_deref(), Some("on chain"));
        Ok(())
    }

    #[tokio::test]
    async fn verify_transaction_counts_matching_notes() -> Result<()> {
        let db = init_test_db().await?;

        db.call(|conn| {
            conn.execute_batch(&format!(
                r#"
                INSERT INTO notes (title, content, author_kind, author_identity, is_blockchain_note, blockchain_tx_hash)
                VALUES ('first', '1', 'email', 'alice@example.com', 1, '{TX_HASH}');
                INSERT INTO notes (title, content, author_kind, author_identity, is_blockchain_note, blockchain_tx_hash)
                VALUES ('second', '2', 'email', 'alice@example.com', 1, '{TX_HASH}');
                "#
            ))
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();

        let server = test_server(db).await?;
        let response = server.get(&format!("/api/v1/blockchain/verify/{TX_HASH}")).await;

        assert_eq!(response.status_code(), 200);
        let verification = response.json::<VerifyTransactionResponse>();
        assert!(verification.verified);
        assert_eq!(verification.transaction_hash, TX_HASH);
        assert_eq!(verification.note_count, 2);
        assert_eq!(verification.notes.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn verify_unknown_transaction_is_not_found() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .get(&format!("/api/v1/blockchain/verify/{TX_HASH}"))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 404);
        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
