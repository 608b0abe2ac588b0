#![forbid(unsafe_code)]

//! Scripted [`DataSource`]: queued responses per view.

use std::collections::VecDeque;

use flipboard_runtime::{DataSource, FetchError, FetchRequest};
use serde_json::Value;

/// Answers each view from its own queue, in order. An exhausted queue
/// answers with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    summary: VecDeque<Result<Value, FetchError>>,
    entries: VecDeque<Result<Value, FetchError>>,
    requests: Vec<FetchRequest>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_summary(mut self, payload: Value) -> Self {
        self.push_summary(payload);
        self
    }

    #[must_use]
    pub fn with_entries(mut self, payload: Value) -> Self {
        self.push_entries(payload);
        self
    }

    pub fn push_summary(&mut self, payload: Value) {
        self.summary.push_back(Ok(payload));
    }

    pub fn fail_summary(&mut self, error: FetchError) {
        self.summary.push_back(Err(error));
    }

    pub fn push_entries(&mut self, payload: Value) {
        self.entries.push_back(Ok(payload));
    }

    pub fn fail_entries(&mut self, error: FetchError) {
        self.entries.push_back(Err(error));
    }

    /// Every request seen so far.
    pub fn requests(&self) -> &[FetchRequest] {
        &self.requests
    }
}

impl DataSource for ScriptedSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<Value, FetchError> {
        self.requests.push(*request);
        let queue = match request {
            FetchRequest::Summary => &mut self.summary,
            FetchRequest::Entries(_) => &mut self.entries,
        };
        queue.pop_front().unwrap_or_else(|| {
            Err(FetchError::Transport(format!(
                "no scripted {} response",
                request.view()
            )))
        })
    }
}
