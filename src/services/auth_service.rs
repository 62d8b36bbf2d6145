use crate::models::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, Session,
};
use crate::services::api_client;
use crate::services::error::{ApiError, AuthError};
use crate::services::session::{self, SessionStore};

/// Exchange credentials for a session. On success the session is
/// persisted before it is returned.
pub async fn login(email: &str, password: &str) -> Result<Session, ApiError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };

    let response: AuthResponse = api_client::post_json("/api/auth/login", &request, false)
        .await
        .map_err(remap_unauthorized)?;

    let session = store_session(response)?;
    log::info!("✅ Login successful for {}", session.user.email);
    Ok(session)
}

/// Create a new account; same contract as login.
pub async fn register(name: &str, email: &str, password: &str) -> Result<Session, ApiError> {
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    };

    let response: AuthResponse = api_client::post_json("/api/auth/register", &request, false)
        .await
        .map_err(remap_unauthorized)?;

    let session = store_session(response)?;
    log::info!("✅ Registration successful for {}", session.user.email);
    Ok(session)
}

/// Silent token refresh. The stored session is replaced wholesale on
/// success; the caller decides what a failure means (forced logout).
pub async fn refresh_session() -> Result<Session, ApiError> {
    let response: AuthResponse =
        api_client::post_json("/api/auth/refresh-token", &serde_json::json!({}), true).await?;
    store_session(response)
}

pub async fn request_password_reset(email: &str) -> Result<String, ApiError> {
    let request = ForgotPasswordRequest {
        email: email.trim().to_string(),
    };
    let response: MessageResponse =
        api_client::post_json("/api/auth/forgot-password", &request, false).await?;
    Ok(response.message)
}

pub async fn reset_password(token: &str, new_password: &str) -> Result<String, ApiError> {
    let request = ResetPasswordRequest {
        token: token.to_string(),
        new_password: new_password.to_string(),
    };
    let response: MessageResponse =
        api_client::post_json("/api/auth/reset-password", &request, false).await?;
    Ok(response.message)
}

/// A 401 on the credential endpoints means the credentials were wrong,
/// not that a session expired.
fn remap_unauthorized(error: ApiError) -> ApiError {
    match error {
        ApiError::Auth(_) => ApiError::Auth(AuthError::InvalidCredentials),
        other => other,
    }
}

fn store_session(response: AuthResponse) -> Result<Session, ApiError> {
    let token = response.token.trim_start_matches("Bearer ").trim().to_string();
    if token.is_empty() {
        return Err(ApiError::Unexpected("No token received from server".to_string()));
    }

    let expires_at =
        session::token_expiry(&token).ok_or(ApiError::Auth(AuthError::Malformed))?;

    let session = Session {
        token,
        user: response.user,
        expires_at,
    };
    SessionStore::browser().persist(&session);
    Ok(session)
}
