mod basic;
mod client;

pub use basic::{BasicClient, FetchConfig};
pub use client::HttpClient;

use bytes::Bytes;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::error::FeedError;

/// Issues a single GET for `url` and returns the body of a `200 OK` reply.
///
/// # Errors
///
/// [`FeedError::FetchFailed`] for any other status, [`FeedError::Transport`]
/// when the host is unreachable, times out, or the body cannot be read.
#[tracing::instrument(skip(client), fields(url = %url))]
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &Url) -> Result<Bytes, FeedError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client.execute(req).await?;
    let status = resp.status();
    if status != StatusCode::OK {
        return Err(FeedError::FetchFailed {
            status: status.as_u16(),
        });
    }

    let body = resp.bytes().await?;
    debug!(bytes = body.len(), "Feed body received");
    Ok(body)
}
