//! Fake Jupiter quote endpoint for integration testing.
//!
//! Serves `GET /v6/quote` on an ephemeral localhost port. Replies are keyed
//! by (venue, input mint) and every query string is recorded.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Canned answer for one (venue, input mint).
#[derive(Clone, Debug)]
pub enum Reply {
    Route { in_amount: u64, out_amount: u64 },
    Status(u16),
}

#[derive(Clone, Default)]
pub struct FakeAggregator {
    replies: Arc<Mutex<HashMap<(String, String), Reply>>>,
    hits: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply for quotes on `venue` spending `input_mint`.
    pub fn reply(self, venue: &str, input_mint: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((venue.to_string(), input_mint.to_string()), reply);
        self
    }

    /// Query strings received so far.
    pub fn hits(&self) -> Vec<HashMap<String, String>> {
        self.hits.lock().unwrap().clone()
    }

    /// Start serving; returns the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/v6/quote", get(quote))
            .with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn quote(
    State(fake): State<FakeAggregator>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.hits.lock().unwrap().push(params.clone());

    let key = (
        params.get("dexes").cloned().unwrap_or_default(),
        params.get("inputMint").cloned().unwrap_or_default(),
    );
    let reply = fake.replies.lock().unwrap().get(&key).cloned();

    match reply {
        Some(Reply::Route {
            in_amount,
            out_amount,
        }) => Json(json!({
            "data": [{
                "inAmount": in_amount.to_string(),
                "outAmount": out_amount.to_string(),
                "priceImpactPct": "0.0001",
            }]
        }))
        .into_response(),
        Some(Reply::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => Json(json!({ "data": [] })).into_response(),
    }
}
