//! Protobuf parser for GTFS Realtime feeds.

use chrono::{DateTime, Utc};
use prost::Message;
use serde::Serialize;

use crate::error::FeedError;
use crate::gtfs_rt::FeedMessage;

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// Decoding is all-or-nothing: a truncated or corrupt payload yields no
/// partial message.
///
/// # Errors
///
/// Returns [`FeedError::Decode`] if the bytes are not valid protobuf for a
/// `FeedMessage`.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_feed(bytes: &[u8]) -> Result<FeedMessage, FeedError> {
    Ok(FeedMessage::decode(bytes)?)
}

/// Entity counts for a decoded feed, used for logging.
#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub gtfs_realtime_version: String,
    pub feed_timestamp: Option<DateTime<Utc>>,
    pub total_entities: usize,
    pub vehicles: usize,
    pub trip_updates: usize,
    pub alerts: usize,
}

impl FeedSummary {
    pub fn from_feed(feed: &FeedMessage) -> Self {
        let mut s = FeedSummary {
            gtfs_realtime_version: feed.header.gtfs_realtime_version.clone(),
            feed_timestamp: feed.header.timestamp.and_then(unix_to_utc),
            total_entities: feed.entity.len(),
            ..Default::default()
        };

        for e in &feed.entity {
            if e.vehicle.is_some() {
                s.vehicles += 1;
            }
            if e.trip_update.is_some() {
                s.trip_updates += 1;
            }
            if e.alert.is_some() {
                s.alerts += 1;
            }
        }

        s
    }
}

/// Converts a POSIX timestamp in seconds; `None` if it is out of range.
pub fn unix_to_utc(secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, 0)
}
