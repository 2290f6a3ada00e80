use std::collections::HashMap;
use std::time::Duration;

use moka::sync::Cache;

use crate::config::StoreConfig;

use super::scoring::{cache_key, compute_score};
use super::{ScoreQuery, Store, StoreError};

/// Process-local store: scores are computed and kept in a bounded TTL
/// cache, interests come from a fixed table.
#[derive(Debug)]
pub struct MemoryStore {
    interests: HashMap<i64, Vec<String>>,
    score_cache: Cache<String, f64>,
}

impl MemoryStore {
    pub fn new(interests: HashMap<i64, Vec<String>>, ttl: Duration, max_entries: u64) -> Self {
        let score_cache = Cache::builder().max_capacity(max_entries).time_to_live(ttl).build();
        Self { interests, score_cache }
    }

    /// Build from config, loading the interests table when a file is set
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let interests = match &config.interests_file {
            Some(path) => load_interests(path)?,
            None => HashMap::new(),
        };
        tracing::info!("Memory store ready with {} client interest entries", interests.len());
        Ok(Self::new(
            interests,
            Duration::from_secs(config.score_cache_ttl_secs),
            config.score_cache_capacity,
        ))
    }
}

/// Parse `{"<client id>": ["interest", ...], ...}`
fn load_interests(path: &str) -> Result<HashMap<i64, Vec<String>>, StoreError> {
    let load_error = |reason: String| StoreError::Load { path: path.to_string(), reason };

    let data = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let raw: HashMap<String, Vec<String>> =
        serde_json::from_str(&data).map_err(|e| load_error(e.to_string()))?;

    raw.into_iter()
        .map(|(id, list)| {
            id.parse::<i64>()
                .map(|id| (id, list))
                .map_err(|_| load_error(format!("invalid client id '{}'", id)))
        })
        .collect()
}

impl Store for MemoryStore {
    fn score(&self, query: &ScoreQuery) -> Result<f64, StoreError> {
        let key = cache_key(query);
        if let Some(score) = self.score_cache.get(&key) {
            tracing::debug!("score cache hit for {}", key);
            return Ok(score);
        }

        let score = compute_score(query);
        self.score_cache.insert(key, score);
        Ok(score)
    }

    fn interests(&self, client_id: i64) -> Result<Vec<String>, StoreError> {
        Ok(self.interests.get(&client_id).cloned().unwrap_or_default())
    }
}
