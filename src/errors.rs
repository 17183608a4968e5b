use std::sync::{Arc, OnceLock};

use crate::error_responses;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::{json_schema, schema_for, schema_for_value, JsonSchema, Schema};
use serde::Serialize;
use serde_json::Value;

pub use response::{ErrorResponse, ErrorResponseDocs};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),

    // ownership
    #[error("missing_actor")]
    MissingActor,
    #[error("forbidden")]
    Forbidden,

    // validation
    #[error("bad_request")]
    BadRequest(String),
    #[error("validation")]
    JsonValidation(JsonSchemaRejection),
    #[error("validation")]
    QueryValidation(#[from] QueryRejection),
    #[error("validation")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    DB(crate::db::Error),

    // other
    #[error(transparent)]
    /// An application-specific error.
    App(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("unexpected")]
    Unexpected(String),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<JsonSchemaRejection> for Error {
    fn from(rejection: JsonSchemaRejection) -> Self {
        Self::JsonValidation(rejection)
    }
}

impl From<crate::db::Error> for Error {
    fn from(error: crate::db::Error) -> Self {
        match error {
            crate::db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

/// crate::Error <--> tokio_rusqlite::Error
///
/// Handlers run ownership checks inside `db.call` closures; a denied check
/// travels out of the closure boxed in `tokio_rusqlite::Error::Other` and is
/// downcast back into `crate::Error` here.
pub mod db_mappers {
    use super::*;
    use crate::db::rusqlite;
    use crate::db::tokio_rusqlite;

    impl From<tokio_rusqlite::Error> for Error {
        fn from(error: tokio_rusqlite::Error) -> Self {
            match error {
                tokio_rusqlite::Error::Other(err) => {
                    if err.is::<Error>() {
                        return *err.downcast::<Error>().unwrap();
                    }
                    Error::DB(tokio_rusqlite::Error::Other(err).into())
                }
                error => Error::from(crate::db::Error::from(error)),
            }
        }
    }

    impl From<rusqlite::Error> for Error {
        fn from(error: rusqlite::Error) -> Self {
            Error::from(crate::db::Error::from(error))
        }
    }

    impl From<Error> for tokio_rusqlite::Error {
        fn from(error: Error) -> Self {
            tokio_rusqlite::Error::Other(error.into())
        }
    }
}

// Response

error_responses! {
    not_found: 404,
    path_validation: 400,
    query_validation: 400,
    json_validation: 400,
    bad_request: 400,
    missing_actor: 401,
    forbidden: 403,
    unexpected: 500
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let errors = errors();
        match error {
            Error::NotFound(message) => errors.not_found.with_message(message),
            Error::MissingActor => errors.missing_actor.with_message("Missing actor identity"),
            Error::Forbidden => errors.forbidden.with_message("Not the owner"),
            Error::BadRequest(message) => errors.bad_request.with_message(message),
            Error::JsonValidation(json_error) => {
                let message = match json_error {
                    JsonSchemaRejection::Json(error) => error.body_text(),
                    JsonSchemaRejection::Serde(error) => error.to_string(),
                    JsonSchemaRejection::Schema(_) => "Request schema validation error".into(),
                };
                errors.json_validation.with_message(message)
            }
            Error::QueryValidation(error) => errors.query_validation.with_message(error.body_text()),
            Error::PathValidation(error) => errors.path_validation.with_message(error.body_text()),
            Error::App(app_error) => {
                let msg = app_error.to_string();
                errors.unexpected.with_message(msg)
            }
            _ => errors.unexpected.with_message("Unexpected"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.clone().as_ref());
        let status = error_res.status;

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        tracing::error!("{:?}", error);
    }

    response
}

mod response {
    use serde_json::Map;

    use super::*;

    #[derive(Debug, Serialize, Clone, Default, JsonSchema)]
    pub struct ErrorResponse {
        pub error: String,
        pub message: Option<String>,
        pub status: u16,
        pub details: Option<Map<String, Value>>,
    }

    impl ErrorResponse {
        pub fn new(error: impl Into<String>, status: u16) -> Self {
            Self {
                error: error.into(),
                status,
                ..Default::default()
            }
        }

        pub fn with_message(&self, message: impl Into<String>) -> Self {
            let mut res = self.clone();
            res.message = Some(message.into());
            res
        }
    }

    pub struct ErrorResponseDocs;

    impl JsonSchema for ErrorResponseDocs {
        fn schema_name() -> std::borrow::Cow<'static, str> {
            std::borrow::Cow::Borrowed("ErrorResponse")
        }

        fn json_schema(gen: &mut schemars::SchemaGenerator) -> Schema {
            let errors = errors();
            let example_schema = schema_for_value!(errors);

            let error_schemas = example_schema
                .get("examples")
                .and_then(|e| e.as_array())
                .and_then(|examples| examples.first())
                .map(|e| e.as_object().unwrap().values())
                .unwrap()
                .map(|v| {
                    let error = v.get("error").unwrap().as_str().unwrap().to_string();
                    let status = v.get("status").unwrap().as_u64().unwrap();

                    let mut schema = schema_for!(ErrorResponse);
                    if let Some(properties) = schema
                        .as_object_mut()
                        .and_then(|s| s.get_mut("properties"))
                        .and_then(|p| p.as_object_mut())
                    {
                        if let Some(p) = properties.get_mut("status").and_then(|p| p.as_object_mut()) {
                            p.insert("enum".into(), Value::from(vec![Value::from(status)]));
                        }
                        if let Some(p) = properties.get_mut("error").and_then(|p| p.as_object_mut()) {
                            p.insert("enum".into(), Value::from(vec![Value::from(error)]));
                        }
                    }

                    schema
                })
                .collect::<Vec<_>>();

            json_schema!({
                "oneOf": error_schemas
            })
        }
    }

    /// Typed responses with a custom JSON schema
    /// ```rust
    /// error_responses! {
    ///     not_found: 404,
    ///     unexpected: 500
    /// }
    ///
    /// impl From<&Error> for ErrorResponse {
    ///     fn from(error: &Error) -> Self {
    ///     let errors = errors(); // <- from macro
    ///     match error {
    ///         Error::NotFound(message) => errors.not_found.with_message(message),
    ///         Error::Unexpected(message) => errors.unexpected.with_message(message),
    ///     }
    /// }
    /// ```
    #[macro_export]
    macro_rules! error_responses {
        (
            $($name:ident: $code:expr),* $(,)?
        ) => {
            #[derive(Debug, Clone, Serialize)]
            struct Responses {
                $(
                    $name: ErrorResponse,
                )*
            }

            static ERRORS: OnceLock<Responses> = OnceLock::new();

            fn errors() -> &'static Responses {
                ERRORS.get_or_init(|| Responses {
                    $(
                        $name: ErrorResponse::new(stringify!($name), $code),
                    )*
                })
            }
        };
    }
}
