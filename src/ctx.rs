use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{identity::AuthorIdentity, DB};

/// Header carrying the identity the caller claims to act as. There is no
/// token or signature behind it; mutations trust this string, exactly as
/// the original trusted its request-supplied wallet address.
pub const ACTOR_HEADER: &str = "x-actor-identity";

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub actor: Option<AuthorIdentity>,
}

impl Ctx {
    pub fn new(actor: Option<AuthorIdentity>) -> Self {
        Self { actor }
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(AuthorIdentity::parse);

        Ok(Self { actor })
    }
}

#[derive(Clone)]
pub struct ReqCtx {
    pub headers: HeaderMap,
    pub actor: Option<AuthorIdentity>,
}

tokio::task_local! {
    pub static REQ_CTX: ReqCtx;
}

pub async fn with_ctx(headers: HeaderMap, ctx: Ctx, request: Request, next: Next) -> crate::Result<Response> {
    Ok(REQ_CTX
        .scope(
            ReqCtx {
                headers,
                actor: ctx.actor,
            },
            next.run(request),
        )
        .await)
}
