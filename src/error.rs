use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error surface shared by every handler. Each variant carries the message
/// the client sees; whatever caused an `Internal` stays on the server side
/// of the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A request field failed validation. The message names the problem.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed or expired bearer credentials.
    #[error("{0}")]
    Auth(String),

    /// Authenticated, but the route needs the admin role.
    #[error("Admin access required")]
    Forbidden,

    /// The entry does not exist, or belongs to someone else. The two cases
    /// are deliberately indistinguishable on the wire.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated. Surfaced as 400 rather than 409.
    #[error("{0}")]
    Conflict(String),

    /// Store or transport failure the caller cannot do anything about.
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // users.email is the only unique constraint a request can trip.
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return ApiError::Conflict("Email already exists".into());
            }
        }
        ApiError::internal("An unexpected error occurred", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            ApiError::Internal { context, source } => {
                error!(error = %source, "{context}");
                if cfg!(debug_assertions) {
                    json!({ "message": context, "error": source.to_string() })
                } else {
                    json!({ "message": context })
                }
            }
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
