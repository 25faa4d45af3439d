use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request against the upstream feed host.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
