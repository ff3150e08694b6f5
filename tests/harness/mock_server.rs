// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process mock of the GIS MT document creation endpoint.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::time::Instant;

/// Canned reply returned for every request.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
}

impl MockReply {
    /// 200 with `{"value": "<id>"}`.
    pub fn created(id: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: serde_json::json!({ "value": id }).to_string(),
        }
    }

    pub fn error(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Request as seen by the mock.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub pg: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: Value,
    pub received_at: Instant,
}

struct MockState {
    reply: MockReply,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Running mock server.
pub struct MockCrpt {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockCrpt {
    /// Start the mock on an ephemeral local port.
    pub async fn start(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/v3/lk/documents/create", post(create_document))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn create_document(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(CapturedRequest {
        pg: query.get("pg").cloned(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        user_agent: header_value(header::USER_AGENT),
        body,
        received_at: Instant::now(),
    });

    (state.reply.status, state.reply.body.clone())
}
