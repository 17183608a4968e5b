mod handlers;
mod model;
pub mod ownership;
mod routes;

pub use model::*;

pub(crate) use handlers::insert_note;

use crate::{openapi::aide::axum::ApiRouter, state::AppState};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new().merge(routes::router(state.clone()))
}
