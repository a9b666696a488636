mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;

/// Issues a GET through `client` and decodes the JSON body.
///
/// `endpoint` names the upstream in errors. Transport failures and non-2xx
/// statuses map to [`FetchError::UpstreamUnavailable`]; bodies that do not
/// decode into `T` map to [`FetchError::MalformedResponse`].
pub async fn fetch_json<C, T>(client: &C, endpoint: &str, url: reqwest::Url) -> Result<T, FetchError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| FetchError::unavailable(endpoint, e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::unavailable(
            endpoint,
            format!("status {}: {}", status, body),
        ));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| FetchError::unavailable(endpoint, e))?;
    debug!(endpoint, bytes = bytes.len(), "Response received");

    serde_json::from_slice(&bytes).map_err(|e| FetchError::malformed(endpoint, e))
}
