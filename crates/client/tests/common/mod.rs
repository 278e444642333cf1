//! Shared fixtures for data store integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use idstore_client::{DataStore, Response, Transport};
use idstore_config::ClientConfig;
use idstore_core::testing::{ManualClock, SequentialNonceGenerator};
use idstore_core::{Error, Result};
use idstore_security::{HttpMethod, Request};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const BASE: &str = "https://api.stormpath.com/v1";

pub fn href(path: &str) -> String {
    format!("{BASE}{path}")
}

/// In-memory transport that replays canned responses and records every
/// request it receives.
///
/// Responses are queued per `(method, url)`; the last queued response for a
/// route is repeated once the queue is drained.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: HttpMethod, url: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };
        self.routes
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(Response::new(status, body));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().last().cloned()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        self.requests.lock().push(request.clone());

        let key = (request.method, request.url().as_str().to_string());
        let mut routes = self.routes.lock();
        let queue = routes
            .get_mut(&key)
            .ok_or_else(|| Error::transport(key.1.clone(), "connection refused"))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::transport(key.1.clone(), "connection refused"))
    }
}

pub struct Fixture {
    pub store: DataStore,
    pub transport: Arc<RecordingTransport>,
    pub clock: Arc<ManualClock>,
}

pub fn fixture() -> Fixture {
    fixture_with(ClientConfig::builder())
}

pub fn fixture_with(config: idstore_config::ClientConfigBuilder) -> Fixture {
    let transport = RecordingTransport::new();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));

    let config = config
        .api_key("test-id", "test-secret")
        .base_url(BASE)
        .build()
        .unwrap();

    let store = DataStore::builder()
        .config(config)
        .transport(transport.clone())
        .clock(clock.clone())
        .nonce_generator(Arc::new(SequentialNonceGenerator::new("nonce")))
        .build()
        .unwrap();

    Fixture {
        store,
        transport,
        clock,
    }
}
