use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{self, Request, StatusCode, header::CONTENT_TYPE},
};
use hfx_positions::fetch::HttpClient;
use hfx_positions::gtfs_rt::{
    FeedEntity, FeedHeader, FeedMessage, Position, TripDescriptor, VehicleDescriptor,
    VehiclePosition,
};
use hfx_positions::server::{AppState, router};
use prost::Message;
use reqwest::Url;
use serde_json::{Value, json};
use std::{path::Path, sync::Arc};
use tower::ServiceExt;

/// Answers every request with a fixed status and body.
struct FixedUpstream {
    status: u16,
    body: Vec<u8>,
}

#[async_trait]
impl HttpClient for FixedUpstream {
    async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let resp = http::Response::builder()
            .status(self.status)
            .body(self.body.clone())
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

/// Fails every request before a response is produced.
struct UnreachableUpstream;

#[async_trait]
impl HttpClient for UnreachableUpstream {
    async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let resp = http::Response::builder().status(500).body("").unwrap();
        Err(reqwest::Response::from(resp).error_for_status().unwrap_err())
    }
}

fn app(client: impl HttpClient + 'static) -> axum::Router {
    let url = Url::parse("https://feed.example/VehiclePositions.pb").unwrap();
    let state = Arc::new(AppState::new(client, url));
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    router(state, &static_dir)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

fn halifax_feed() -> Vec<u8> {
    FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            timestamp: Some(1739828851),
            incrementality: None,
            feed_version: None,
        },
        entity: vec![
            FeedEntity {
                id: "1".to_string(),
                vehicle: Some(VehiclePosition {
                    vehicle: Some(VehicleDescriptor {
                        id: Some("3410".to_string()),
                        label: Some("1410".to_string()),
                        ..Default::default()
                    }),
                    position: Some(Position {
                        latitude: 44.64,
                        longitude: -63.57,
                        bearing: None,
                        odometer: None,
                        speed: None,
                    }),
                    trip: Some(TripDescriptor {
                        route_id: Some("22".to_string()),
                        start_date: Some("20250217".to_string()),
                        ..Default::default()
                    }),
                    timestamp: Some(1739828851),
                    ..Default::default()
                }),
                ..Default::default()
            },
            FeedEntity {
                id: "2".to_string(),
                ..Default::default()
            },
        ],
    }
    .encode_to_vec()
}

#[tokio::test]
async fn test_positions_returns_projected_records() {
    let upstream = FixedUpstream {
        status: 200,
        body: halifax_feed(),
    };

    let (status, content_type, body) = get(app(upstream), "/api/positions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        String::from_utf8(body).unwrap(),
        concat!(
            r#"[{"vehicle_id":"3410","vehicle_label":"1410","route_id":"22","#,
            r#""timestamp":1739828851,"direction_id":null,"start_date":"20250217","#,
            r#""latitude":44.64,"longitude":-63.57,"speed":null}]"#
        )
    );
}

#[tokio::test]
async fn test_empty_feed_is_an_empty_array() {
    let upstream = FixedUpstream {
        status: 200,
        body: vec![],
    };

    let (status, _, body) = get(app(upstream), "/api/positions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn test_upstream_status_is_reported_in_envelope() {
    let upstream = FixedUpstream {
        status: 503,
        body: b"maintenance".to_vec(),
    };

    let (status, content_type, body) = get(app(upstream), "/api/positions").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "Failed to retrieve data", "status_code": 503})
    );
}

#[tokio::test]
async fn test_malformed_payload_is_an_error_envelope() {
    let mut bytes = halifax_feed();
    bytes.truncate(bytes.len() - 4);
    let upstream = FixedUpstream {
        status: 200,
        body: bytes,
    };

    let (status, _, body) = get(app(upstream), "/api/positions").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "Failed to decode feed data", "status_code": 500})
    );
}

#[tokio::test]
async fn test_transport_failure_is_an_error_envelope() {
    let (status, _, body) = get(app(UnreachableUpstream), "/api/positions").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Failed to retrieve data");
    assert_eq!(body["status_code"], 500);
}

#[tokio::test]
async fn test_index_serves_html() {
    let upstream = FixedUpstream {
        status: 200,
        body: vec![],
    };

    let (status, content_type, body) = get(app(upstream), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(String::from_utf8(body).unwrap().contains("/api/positions"));
}
