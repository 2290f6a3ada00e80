use sha2::{Digest, Sha256};

use super::ScoreQuery;
use crate::validation::Gender;

const PHONE_WEIGHT: f64 = 1.5;
const EMAIL_WEIGHT: f64 = 1.5;
const BIRTHDAY_GENDER_WEIGHT: f64 = 1.5;
const FULL_NAME_WEIGHT: f64 = 0.5;

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// Score a client from the attributes they supplied
pub fn compute_score(query: &ScoreQuery) -> f64 {
    let mut score = 0.0;
    if filled(&query.phone) {
        score += PHONE_WEIGHT;
    }
    if filled(&query.email) {
        score += EMAIL_WEIGHT;
    }
    // An unknown gender does not complete the birthday pair
    let known_gender = query.gender.is_some_and(|g| g != Gender::Unknown);
    if query.birthday.is_some() && known_gender {
        score += BIRTHDAY_GENDER_WEIGHT;
    }
    if filled(&query.first_name) && filled(&query.last_name) {
        score += FULL_NAME_WEIGHT;
    }
    score
}

/// Cache key identifying the person behind a query. Email and gender are
/// deliberately not part of the identity.
pub fn cache_key(query: &ScoreQuery) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.first_name.as_deref().unwrap_or_default());
    hasher.update(query.last_name.as_deref().unwrap_or_default());
    hasher.update(query.phone.as_deref().unwrap_or_default());
    if let Some(birthday) = query.birthday {
        hasher.update(birthday.format("%Y%m%d").to_string());
    }
    format!("uid:{:x}", hasher.finalize())
}
