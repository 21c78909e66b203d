//! In-memory transport for tests.

use crate::{HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

struct MockReply {
    delay: Option<Duration>,
    outcome: Result<HttpResponse, TransportError>,
}

/// Replays queued responses in order and records every request sent.
///
/// When the queue runs dry, `send` fails with [`TransportError::Other`].
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) -> &Self {
        self.push(MockReply {
            delay: None,
            outcome: Ok(response),
        });
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_response(HttpResponse::json_body(status, &body))
    }

    /// Queue a response with an arbitrary content type.
    pub fn push_raw(&self, status: u16, content_type: &str, body: &str) -> &Self {
        self.push_response(HttpResponse::with_content_type(status, content_type, body))
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) -> &Self {
        self.push(MockReply {
            delay: None,
            outcome: Err(error),
        });
        self
    }

    /// Queue a JSON response that arrives after `delay`.
    pub fn push_delayed(&self, delay: Duration, status: u16, body: Value) -> &Self {
        self.push(MockReply {
            delay: Some(delay),
            outcome: Ok(HttpResponse::json_body(status, &body)),
        });
        self
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match reply {
            Some(reply) => {
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }
                reply.outcome
            }
            None => Err(TransportError::Other("no mock response queued".into())),
        }
    }
}
