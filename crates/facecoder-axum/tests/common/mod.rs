//! Shared fixtures for facecoder-axum integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use facecoder_axum::{AxumContext, CorsConfig, create_router};
use facecoder_core::{Embedding, EncodingCoordinatorConfig, EncodingServiceError, EncodingServicePort};
use facecoder_db::TestDb;

/// Encoding service stand-in.
pub enum StubEncoder {
    /// Answers `[position, route length]` for each route.
    Positional(AtomicUsize),
    /// Fails every batch with a 502 from upstream.
    Unavailable(AtomicUsize),
}

impl StubEncoder {
    pub fn positional() -> Arc<Self> {
        Arc::new(Self::Positional(AtomicUsize::new(0)))
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self::Unavailable(AtomicUsize::new(0)))
    }

    /// Number of batch calls received.
    pub fn calls(&self) -> usize {
        match self {
            Self::Positional(calls) | Self::Unavailable(calls) => calls.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl EncodingServicePort for StubEncoder {
    async fn encode_batch(
        &self,
        routes: &[String],
    ) -> Result<Vec<Embedding>, EncodingServiceError> {
        match self {
            Self::Positional(calls) => {
                calls.fetch_add(1, Ordering::SeqCst);
                #[allow(clippy::cast_precision_loss)]
                Ok(routes
                    .iter()
                    .enumerate()
                    .map(|(i, route)| Embedding::new(vec![i as f64, route.len() as f64]))
                    .collect())
            }
            Self::Unavailable(calls) => {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(EncodingServiceError::Status { status: 502 })
            }
        }
    }
}

/// Router over an in-memory database.
pub fn app(db: &TestDb, encoder: Arc<StubEncoder>) -> Router {
    let ctx = AxumContext::new(db.repos(), encoder, EncodingCoordinatorConfig::default());
    create_router(ctx, &CorsConfig::AllowAll)
}

/// Send one request and decode the JSON response body (`Null` when empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A group with two member profiles and one outsider.
pub struct Family {
    pub db: TestDb,
    pub group: i64,
    pub parent: i64,
    pub child: i64,
    pub outsider: i64,
}

pub async fn family() -> Family {
    let db = TestDb::new().await.unwrap();
    let user = db.insert_user("owner").await.unwrap();
    let parent = db.insert_profile(user, "parent").await.unwrap();
    let child = db.insert_profile(user, "child").await.unwrap();
    let outsider = db.insert_profile(user, "outsider").await.unwrap();
    let group = db.insert_group("family").await.unwrap();
    db.relate(parent, group).await.unwrap();
    db.relate(child, group).await.unwrap();
    Family {
        db,
        group,
        parent,
        child,
        outsider,
    }
}
