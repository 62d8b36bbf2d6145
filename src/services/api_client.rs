use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::CONFIG;
use crate::services::error::{classify_status, ApiError};
use crate::services::session::SessionStore;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn url(path: &str) -> String {
    format!("{}{}", CONFIG.api_url(), path)
}

/// Adds the stored bearer token, if any. Stored tokens are kept without
/// the "Bearer " prefix, but a prefixed one is tolerated.
fn attach_bearer(builder: RequestBuilder) -> RequestBuilder {
    match SessionStore::browser().stored_token() {
        Some(token) => {
            let value = format!("Bearer {}", token.trim_start_matches("Bearer ").trim());
            builder.header("Authorization", &value)
        }
        None => builder,
    }
}

/// Sends the request racing a fixed timeout. A request that produces no
/// response at all classifies as a connection failure.
async fn send_with_timeout(request: Request) -> Result<Response, ApiError> {
    let send = request.send();
    let timeout = TimeoutFuture::new(CONFIG.request_timeout_ms);
    futures::pin_mut!(send, timeout);

    match select(send, timeout).await {
        Either::Left((Ok(response), _)) => Ok(response),
        Either::Left((Err(err), _)) => {
            log::error!("❌ Request failed: {}", err);
            Err(ApiError::Connection)
        }
        Either::Right(((), _)) => {
            log::error!("❌ Request timed out after {}ms", CONFIG.request_timeout_ms);
            Err(ApiError::Timeout)
        }
    }
}

async fn handle_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unexpected(format!("Unexpected response format: {}", e)))
    } else {
        let status = response.status();
        let message = response.json::<ErrorBody>().await.ok().and_then(|b| b.message);

        if status == 401 {
            // Interceptor semantics: drop the stored session before the
            // error reaches the caller.
            log::info!("🔒 Received 401, clearing stored session");
            SessionStore::browser().clear_session();
        }

        Err(classify_status(status, message))
    }
}

pub async fn post_json<B, T>(path: &str, body: &B, authorized: bool) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let mut builder = Request::post(&url(path));
    if authorized {
        builder = attach_bearer(builder);
    }
    let request = builder
        .json(body)
        .map_err(|e| ApiError::Unexpected(format!("Error serializing request: {}", e)))?;

    let response = send_with_timeout(request).await?;
    handle_json(response).await
}

pub async fn get_json<T>(path: &str, authorized: bool) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let mut builder = Request::get(&url(path));
    if authorized {
        builder = attach_bearer(builder);
    }
    let request = builder
        .build()
        .map_err(|e| ApiError::Unexpected(format!("Error building request: {}", e)))?;

    let response = send_with_timeout(request).await?;
    handle_json(response).await
}

pub async fn put_json<B, T>(path: &str, body: &B, authorized: bool) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let mut builder = Request::put(&url(path));
    if authorized {
        builder = attach_bearer(builder);
    }
    let request = builder
        .json(body)
        .map_err(|e| ApiError::Unexpected(format!("Error serializing request: {}", e)))?;

    let response = send_with_timeout(request).await?;
    handle_json(response).await
}
