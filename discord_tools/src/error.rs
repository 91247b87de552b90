use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DiscordApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Request could not be sent: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
