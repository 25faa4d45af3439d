//! Output formatting and persistence for projected vehicle records.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::gtfs_rt::FeedMessage;
use crate::parser::unix_to_utc;
use crate::projection::VehicleRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs records using Rust's debug pretty-print format.
pub fn print_pretty(records: &[VehicleRecord]) {
    info!("{:#?}", records);
}

/// Logs records as a pretty-printed JSON array.
pub fn print_json(records: &[VehicleRecord]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Logs every entity of a feed, with vehicle identity and position when the
/// entity carries a vehicle.
pub fn log_entities(feed: &FeedMessage) {
    for entity in &feed.entity {
        debug!(entity_id = %entity.id, "{:?}", entity);

        let Some(vehicle) = &entity.vehicle else {
            info!(entity_id = %entity.id, "No vehicle data found in this entity");
            continue;
        };

        let descriptor = vehicle.vehicle.as_ref();
        let reported_at = vehicle.timestamp.and_then(unix_to_utc);
        info!(
            entity_id = %entity.id,
            vehicle_id = descriptor.and_then(|d| d.id.as_deref()),
            vehicle_label = descriptor.and_then(|d| d.label.as_deref()),
            reported_at = ?reported_at,
            "Vehicle"
        );

        if let Some(position) = &vehicle.position {
            info!(
                latitude = position.latitude,
                longitude = position.longitude,
                speed = position.speed,
                "Position"
            );
        }
    }
}

/// Appends [`VehicleRecord`]s as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. Absent
/// optional fields are written as empty cells.
pub fn append_records(path: &str, records: &[VehicleRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
