use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use meal_plan_engine::MealPlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    PaymentVerificationFailed(String),
    #[error("{0}")]
    NotificationFailure(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("Forbidden. {0}")]
    Forbidden(String),
}

impl ServerError {
    /// Errors where nothing was written, so the client can safely send the same request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotificationFailure(_))
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PaymentVerificationFailed(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotificationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.is_retryable() {
            serde_json::json!({ "error": self.to_string(), "retryable": true })
        } else {
            serde_json::json!({ "error": self.to_string() })
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<MealPlanError> for ServerError {
    fn from(e: MealPlanError) -> Self {
        match e {
            MealPlanError::ValidationError(_) => Self::ValidationError(e.to_string()),
            MealPlanError::MenuNotFound { .. }
            | MealPlanError::CustomerNotFound(_)
            | MealPlanError::OrderNotFound(_)
            | MealPlanError::DeliveryNotFound(_) => Self::NoRecordFound(e.to_string()),
            MealPlanError::VerificationError => Self::PaymentVerificationFailed(e.to_string()),
            MealPlanError::NotificationFailure(_) => Self::NotificationFailure(e.to_string()),
            MealPlanError::InvalidTransition { .. } => Self::InvalidTransition(e.to_string()),
            MealPlanError::DatabaseError(_) => {
                error!("💻️ Database error while handling a request. {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}
