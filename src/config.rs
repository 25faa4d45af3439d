//! Runtime configuration for the HTTP facade.

use reqwest::Url;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::fetch::FetchConfig;

pub const DEFAULT_FEED_URL: &str = "https://gtfs.halifax.ca/realtime/Vehicle/VehiclePositions.pb";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TLS needs both a certificate and a key; {0} is missing")]
    IncompleteTls(&'static str),
}

/// Certificate chain and private key, both PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl TlsPaths {
    /// Pairs up the optional cert/key paths. Neither given means plain HTTP.
    pub fn from_parts(
        cert: Option<PathBuf>,
        key: Option<PathBuf>,
    ) -> Result<Option<Self>, ConfigError> {
        match (cert, key) {
            (Some(cert), Some(key)) => Ok(Some(TlsPaths { cert, key })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::IncompleteTls("key")),
            (None, Some(_)) => Err(ConfigError::IncompleteTls("certificate")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub feed_url: Url,
    /// Directory holding the frontend's `index.html`.
    pub static_dir: PathBuf,
    pub tls: Option<TlsPaths>,
    pub fetch: FetchConfig,
}
