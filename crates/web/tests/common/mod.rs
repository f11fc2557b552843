#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use futures::TryStreamExt;
use object_store::{ObjectStore, memory::InMemory, path::Path};
use serde_json::Value;
use storage::repository::memory::{InMemoryEventStore, InMemoryParticipantStore};
use tower::ServiceExt;
use web::{AppState, app, config::DEFAULT_MAX_BODY_BYTES, uploads::UploadStore};

pub const UPLOAD_BASE_URL: &str = "https://uploads.test";
pub const BOUNDARY: &str = "registration-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub participants: Arc<InMemoryParticipantStore>,
    pub objects: Arc<InMemory>,
}

impl TestApp {
    pub fn new() -> Self {
        let participants = Arc::new(InMemoryParticipantStore::new());
        let objects = Arc::new(InMemory::new());

        let state = AppState {
            events: Arc::new(InMemoryEventStore::new()),
            participants: participants.clone(),
            uploads: UploadStore::new(objects.clone(), UPLOAD_BASE_URL),
        };

        Self {
            router: app(state, DEFAULT_MAX_BODY_BYTES),
            participants,
            objects,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    pub async fn multipart(
        &self,
        uri: &str,
        text: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(text, files)))
            .unwrap();

        self.send(request).await
    }

    pub async fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
            .unwrap();
        keys.sort();
        keys
    }

    pub async fn object_bytes(&self, key: &str) -> Vec<u8> {
        self.objects
            .get(&Path::from(key))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap()
            .to_vec()
    }
}

pub fn multipart_body(text: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in text {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// The registration used throughout the examples.
pub fn ada_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("designation", "Engineer"),
        ("idCardType", "Staff"),
        ("institute", "X"),
        ("eventId", "E1"),
        ("eventName", "Launch"),
    ]
}

pub fn ada_json() -> Value {
    let map = ada_fields()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Value::Object(map)
}
