//! Test doubles shared across modules
//!
//! Provider stubs are real axum routers bound to an ephemeral localhost port,
//! so the HTTP clients are exercised end to end.

use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::trip::{TravelStyle, TripRequest, DEFAULT_BUDGET, DEFAULT_DAYS, DEFAULT_PEOPLE};
use async_trait::async_trait;
use axum::Router;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

/// Serve `app` on `127.0.0.1:0` and return its base URL (no trailing slash).
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Form defaults with the given destination and Budget style
pub fn trip_request(destination: &str) -> TripRequest {
    TripRequest {
        destination: destination.to_string(),
        days: DEFAULT_DAYS,
        people: DEFAULT_PEOPLE,
        budget: DEFAULT_BUDGET,
        style: TravelStyle::Budget,
        interests: BTreeSet::new(),
    }
}

/// Mock LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful completion
    pub fn queue_text(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(LlmResponse::from_text(text)));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::unknown("No queued response")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
