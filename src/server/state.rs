use reqwest::Url;

use crate::fetch::HttpClient;

/// Read-only per-process state shared by every request.
pub struct AppState {
    pub client: Box<dyn HttpClient>,
    pub feed_url: Url,
}

impl AppState {
    pub fn new(client: impl HttpClient + 'static, feed_url: Url) -> Self {
        Self {
            client: Box::new(client),
            feed_url,
        }
    }
}
