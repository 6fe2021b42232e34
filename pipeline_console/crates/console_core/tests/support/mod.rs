#![allow(dead_code)]

use async_trait::async_trait;
use console_core::{FetchError, Method, Notifier, Transport};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

enum Scripted {
    Ok(Value, Duration),
    Status(StatusCode, String),
}

/// Transport answering from per-path queues of scripted responses.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, body: Value) -> Self {
        self.push(path, Scripted::Ok(body, Duration::ZERO))
    }

    pub fn respond_after(self, path: &str, body: Value, delay: Duration) -> Self {
        self.push(path, Scripted::Ok(body, delay))
    }

    pub fn fail(self, path: &str, status: StatusCode, message: &str) -> Self {
        self.push(path, Scripted::Status(status, message.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, path: &str, scripted: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|q| q.pop_front());

        match next {
            Some(Scripted::Ok(body, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(body)
            }
            Some(Scripted::Status(status, message)) => Err(FetchError::BadStatus { status, message }),
            None => Err(FetchError::BadStatus {
                status: StatusCode::NOT_FOUND,
                message: format!("no scripted response for {path}"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error { text: String, title: String },
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, text: &str) {
        self.seen
            .lock()
            .unwrap()
            .push(Notification::Success(text.to_string()));
    }

    fn error(&self, text: &str, title: &str) {
        self.seen.lock().unwrap().push(Notification::Error {
            text: text.to_string(),
            title: title.to_string(),
        });
    }
}
