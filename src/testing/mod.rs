use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use crate::method::MethodEnvelope;
use crate::store::{ScoreQuery, Store, StoreError};

/// How a stub store answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StubMode {
    Answer,
    Fail,
    Panic,
}

/// Store double with a fixed score and predictable interests
#[derive(Debug)]
pub struct StubStore {
    score: f64,
    mode: StubMode,
    score_calls: AtomicUsize,
}

impl Default for StubStore {
    fn default() -> Self {
        Self::with_score(5.0)
    }
}

impl StubStore {
    pub fn with_score(score: f64) -> Self {
        Self { score, mode: StubMode::Answer, score_calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { mode: StubMode::Fail, ..Self::default() }
    }

    pub fn panicking() -> Self {
        Self { mode: StubMode::Panic, ..Self::default() }
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, value: T) -> Result<T, StoreError> {
        match self.mode {
            StubMode::Answer => Ok(value),
            StubMode::Fail => Err(StoreError::Operation("stub store is down".to_string())),
            StubMode::Panic => panic!("stub store exploded"),
        }
    }
}

impl Store for StubStore {
    fn score(&self, _query: &ScoreQuery) -> Result<f64, StoreError> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(self.score)
    }

    fn interests(&self, client_id: i64) -> Result<Vec<String>, StoreError> {
        self.answer(vec![format!("interest-{}", client_id), "shared".to_string()])
    }
}

/// A valid envelope for `login` calling `method`, token left empty
pub fn envelope(login: &str, method: &str, arguments: Value) -> MethodEnvelope {
    MethodEnvelope::parse(
        json!({
            "account": "h&f",
            "login": login,
            "method": method,
            "token": "",
            "arguments": arguments,
        }),
        "admin",
    )
    .expect("test envelope must be valid")
}
