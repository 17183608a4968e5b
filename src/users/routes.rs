use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::post, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json,
    },
    state::AppState,
};

use super::handlers;
use super::{LoginUser, RegisterUser};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route("/api/v1/auth/register", post(register))
        .api_route("/api/v1/auth/login", post(login))
        .with_state(state)
}

async fn register(NoApi(base): NoApi<BaseParams>, Json(args): Json<RegisterUser>) -> impl IntoApiResponse {
    handlers::register(args, base).await.map(Json)
}

async fn login(NoApi(base): NoApi<BaseParams>, Json(args): Json<LoginUser>) -> impl IntoApiResponse {
    handlers::login(args, base).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{init_test_db, DB},
        errors::Result,
        users::{LoginResponse, UserResponse},
    };
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn register_lowercases_email() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Alice",
                "email": "Alice@Example.com",
                "password": "hunter2"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let user = response.json::<UserResponse>();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "hunter2"
            }))
            .await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Another Alice",
                "email": "ALICE@example.com",
                "password": "hunter3"
            }))
            .expect_failure()
            .await;

        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn login_roundtrip() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "hunter2"
            }))
            .await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "Alice@Example.com",
                "password": "hunter2"
            }))
            .await;

        let login = response.json::<LoginResponse>();
        assert!(login.success);
        assert_eq!(login.user.unwrap().email, "alice@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn login_with_bad_credentials_succeeds_with_failure_body() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        server
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "hunter2"
            }))
            .await;

        let wrong_password = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "alice@example.com",
                "password": "hunter3"
            }))
            .await;

        let unknown_user = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "bob@example.com",
                "password": "hunter2"
            }))
            .await;

        let wrong_password = wrong_password.json::<LoginResponse>();
        let unknown_user = unknown_user.json::<LoginResponse>();
        assert!(!wrong_password.success);
        assert!(!unknown_user.success);
        assert_eq!(wrong_password.message, unknown_user.message);
        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
