//! Flattens vehicle entities of a decoded feed into [`VehicleRecord`]s.

use serde::Serialize;

use crate::gtfs_rt::{FeedMessage, VehiclePosition};

/// Flat view of one vehicle as served to the map frontend.
///
/// Optional fields are `None` (JSON `null`) whenever the source field or its
/// enclosing sub-message was absent from the wire message; a zero is never
/// substituted.
///
/// A float that is present but non-finite (`NaN`, `±inf`) is kept as `Some`
/// here, but JSON has no encoding for it and serializes it as `null`, the
/// same as an absent value. CSV output writes it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub vehicle_id: String,
    pub vehicle_label: String,
    pub route_id: Option<String>,
    pub timestamp: u64,
    pub direction_id: Option<u32>,
    pub start_date: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub speed: Option<f32>,
}

impl VehicleRecord {
    pub fn from_vehicle(v: &VehiclePosition) -> Self {
        let descriptor = v.vehicle.as_ref();
        let trip = v.trip.as_ref();
        let position = v.position.as_ref();

        VehicleRecord {
            vehicle_id: descriptor.and_then(|d| d.id.clone()).unwrap_or_default(),
            vehicle_label: descriptor
                .and_then(|d| d.label.clone())
                .unwrap_or_default(),
            route_id: trip.and_then(|t| t.route_id.clone()),
            timestamp: v.timestamp.unwrap_or_default(),
            direction_id: trip.and_then(|t| t.direction_id),
            start_date: trip.and_then(|t| t.start_date.clone()),
            latitude: position.map(|p| p.latitude),
            longitude: position.map(|p| p.longitude),
            speed: position.and_then(|p| p.speed),
        }
    }
}

/// Projects every entity carrying a vehicle, in feed order.
pub fn project(feed: &FeedMessage) -> Vec<VehicleRecord> {
    feed.entity
        .iter()
        .filter_map(|e| e.vehicle.as_ref())
        .map(VehicleRecord::from_vehicle)
        .collect()
}
