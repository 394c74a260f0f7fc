use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhatsappApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Message request failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("WhatsApp accepted the request but returned no message id")]
    EmptyResponse,
}
