//! In-memory [`JsonApi`] used by unit tests.

use super::JsonApi;
use crate::error::FetchError;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Canned {
    Payload(Value),
    Status(u16),
}

type Fallback = Box<dyn Fn(&str) -> Value + Send + Sync>;

/// Fake API answering from canned responses and recording every request.
///
/// Endpoints with several queued responses answer them in order; the last
/// one repeats. Unknown endpoints go to the fallback, or 404 without one.
#[derive(Default)]
pub struct FakeApi {
    responses: Mutex<HashMap<String, VecDeque<Canned>>>,
    fallback: Option<Fallback>,
    requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, endpoint: &str, payload: Value) -> Self {
        self.push(endpoint, Canned::Payload(payload));
        self
    }

    pub fn with_status(self, endpoint: &str, code: u16) -> Self {
        self.push(endpoint, Canned::Status(code));
        self
    }

    pub fn with_fallback(mut self, fallback: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Endpoints requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, endpoint: &str, canned: Canned) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(canned);
    }

    fn answer(&self, endpoint: &str) -> Result<Value, FetchError> {
        self.requests.lock().unwrap().push(endpoint.to_string());

        let canned = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(endpoint) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match canned {
            Some(Canned::Payload(value)) => Ok(value),
            Some(Canned::Status(code)) => Err(status_error(endpoint, code)),
            None => match &self.fallback {
                Some(fallback) => Ok(fallback(endpoint)),
                None => Err(status_error(endpoint, 404)),
            },
        }
    }
}

fn status_error(endpoint: &str, code: u16) -> FetchError {
    FetchError::UnexpectedStatus {
        code,
        url: format!("fake://{}", endpoint),
    }
}

impl JsonApi for FakeApi {
    fn request<'a>(&'a self, endpoint: &'a str) -> BoxFuture<'a, Result<Value, FetchError>> {
        let result = self.answer(endpoint);
        async move { result }.boxed()
    }
}
