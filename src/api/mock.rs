use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::Result;

use super::{ApiError, ApiRequest, ApiResponse, ApiTransport};

#[derive(Debug, Clone)]
enum Outcome {
    Response(ApiResponse),
    Error(ApiError),
}

#[derive(Debug)]
struct Scripted {
    outcome: Outcome,
    gate: Option<oneshot::Receiver<()>>,
}

/// In-memory transport replaying scripted responses.
///
/// Responses are queued per method and path and consumed in order. The last
/// ungated response for a route keeps answering once the queue is down to it.
/// Unscripted routes answer `404`. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queue a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) {
        self.push(
            method,
            path,
            Scripted {
                outcome: Outcome::Response(response),
                gate: None,
            },
        );
    }

    /// Queue a `200` JSON response for `method path`.
    pub fn respond_json(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, ApiResponse::ok(body));
    }

    /// Queue a transport failure (no response at all) for `method path`.
    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(
            method,
            path,
            Scripted {
                outcome: Outcome::Error(ApiError::new(message)),
                gate: None,
            },
        );
    }

    /// Queue a response that is held back until the returned sender fires or
    /// is dropped.
    pub fn respond_after(
        &self,
        method: Method,
        path: &str,
        response: ApiResponse,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(
            method,
            path,
            Scripted {
                outcome: Outcome::Response(response),
                gate: Some(rx),
            },
        );
        tx
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    fn next(&self, method: &Method, path: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        match queue.front() {
            Some(last) if queue.len() == 1 && last.gate.is_none() => Some(Scripted {
                outcome: last.outcome.clone(),
                gate: None,
            }),
            _ => queue.pop_front(),
        }
    }
}

impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().push(request.clone());

        let Some(scripted) = self.next(&request.method, &request.path) else {
            return Ok(ApiResponse::error(
                StatusCode::NOT_FOUND,
                &format!("no route for {} {}", request.method, request.path),
            ));
        };

        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }

        match scripted.outcome {
            Outcome::Response(response) => Ok(response),
            Outcome::Error(err) => Err(err.into()),
        }
    }
}
