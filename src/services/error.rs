use thiserror::Error;

/// Why an authentication credential was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Your session has expired. Please log in again.")]
    Expired,

    #[error("Stored credentials are malformed")]
    Malformed,
}

/// Classification of every failure the remote API boundary can produce.
/// Client-side validation failures never become an ApiError; they are
/// caught before any request is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response received at all.
    #[error("Connection error. Please check your internet connection and try again.")]
    Connection,

    #[error("The request timed out. Please try again.")]
    Timeout,

    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Server-side 400: the backend rejected the payload.
    #[error("{0}")]
    BadRequest(String),

    #[error("The requested resource was not found")]
    NotFound,

    /// 409: the appointment slot was taken in the meantime.
    #[error("That time slot is no longer available. Please pick another time.")]
    Conflict,

    #[error("Server error ({0}). Please try again later.")]
    Server(u16),

    #[error("{0}")]
    Unexpected(String),
}

/// Maps an HTTP status (plus the optional server-supplied message) onto
/// the error taxonomy. 401 defaults to an expired session; the login and
/// register paths remap it to bad credentials.
pub fn classify_status(status: u16, message: Option<String>) -> ApiError {
    match status {
        400 => ApiError::BadRequest(
            message.unwrap_or_else(|| "Please check your input and try again.".to_string()),
        ),
        401 => ApiError::Auth(AuthError::Expired),
        404 => ApiError::NotFound,
        409 => ApiError::Conflict,
        500..=599 => ApiError::Server(status),
        other => ApiError::Unexpected(
            message.unwrap_or_else(|| format!("Unexpected response ({})", other)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_the_taxonomy() {
        assert_eq!(
            classify_status(400, Some("Date is required".into())),
            ApiError::BadRequest("Date is required".into())
        );
        assert_eq!(classify_status(401, None), ApiError::Auth(AuthError::Expired));
        assert_eq!(classify_status(404, None), ApiError::NotFound);
        assert_eq!(classify_status(409, None), ApiError::Conflict);
        assert_eq!(classify_status(500, None), ApiError::Server(500));
        assert_eq!(classify_status(503, None), ApiError::Server(503));
    }

    #[test]
    fn unclassified_status_keeps_server_message() {
        match classify_status(418, Some("teapot".into())) {
            ApiError::Unexpected(msg) => assert_eq!(msg, "teapot"),
            other => panic!("unexpected classification: {:?}", other),
        }
    }
}
