use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Connection settings for the upstream feed host.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Skip certificate verification for the upstream host. Off unless
    /// explicitly requested.
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
        }
    }
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        if config.accept_invalid_certs {
            warn!("Upstream TLS certificate verification is DISABLED");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
