pub mod memory;
pub mod scoring;

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::Gender;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to load interests from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Identity attributes a score is computed from. Every attribute is
/// optional; the argument validation guarantees at least one usable pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreQuery {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// External scoring and interests service.
///
/// Implementations are shared across concurrent calls and are responsible
/// for their own synchronization. Calls may block.
pub trait Store: Send + Sync {
    fn score(&self, query: &ScoreQuery) -> Result<f64, StoreError>;

    fn interests(&self, client_id: i64) -> Result<Vec<String>, StoreError>;
}
