// handlers/mod.rs - method handlers and the name -> handler registry
//
// Each handler declares the schema its arguments are validated against and
// the business logic run once the envelope, the token and the arguments
// have all been accepted by the dispatcher.

pub mod clients_interests;
pub mod online_score;

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::error::default_error_text;
use crate::method::{Context, MethodEnvelope};
use crate::store::{Store, StoreError};
use crate::validation::{Schema, ValidatedRequest};

pub use clients_interests::ClientsInterestsHandler;
pub use online_score::OnlineScoreHandler;

/// Payload plus status code produced by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReply {
    pub payload: Value,
    pub code: StatusCode,
}

impl MethodReply {
    pub fn ok(payload: Value) -> Self {
        Self { payload, code: StatusCode::OK }
    }

    pub fn is_error(&self) -> bool {
        self.code.is_client_error() || self.code.is_server_error()
    }

    /// Success codes wrap the payload in `response`, error codes in `error`
    pub fn to_json(&self) -> Value {
        if self.is_error() {
            let error = match &self.payload {
                Value::Null => Value::from(default_error_text(self.code)),
                Value::String(s) if s.is_empty() => Value::from(default_error_text(self.code)),
                other => other.clone(),
            };
            json!({ "error": error, "code": self.code.as_u16() })
        } else {
            json!({ "response": self.payload, "code": self.code.as_u16() })
        }
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("handler failed: {0}")]
    Internal(String),
}

/// Business logic bound to one method name
pub trait MethodHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Schema the `arguments` mapping is validated against
    fn schema(&self) -> &Schema;

    fn handle(
        &self,
        envelope: &MethodEnvelope,
        arguments: &ValidatedRequest<'_>,
        ctx: &mut Context,
        store: &dyn Store,
    ) -> Result<MethodReply, HandlerError>;
}

pub type HandlerBox = Box<dyn MethodHandler>;

/// Static method name -> handler table
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<&'static str, HandlerBox>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every method the gateway serves
    pub fn standard(auth: &AuthConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(OnlineScoreHandler::new(auth.admin_score)));
        registry.register(Box::new(ClientsInterestsHandler));
        registry
    }

    pub fn register(&mut self, handler: HandlerBox) {
        let name = handler.name();
        if self.handlers.insert(name, handler).is_some() {
            tracing::warn!("Handler for method '{}' replaced", name);
        }
        tracing::debug!("Registered handler for method '{}'", name);
    }

    pub fn get(&self, method: &str) -> Option<&dyn MethodHandler> {
        self.handlers.get(method).map(|h| h.as_ref())
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry").field("methods", &self.methods()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_serves_both_methods() {
        let registry = HandlerRegistry::standard(&AuthConfig::default());
        assert_eq!(registry.methods(), vec!["clients_interests", "online_score"]);
        assert!(registry.get("online_score").is_some());
        assert!(registry.get("offline_score").is_none());
    }

    #[test]
    fn declared_rules_only_reference_declared_fields() {
        let registry = HandlerRegistry::standard(&AuthConfig::default());
        for method in registry.methods() {
            let schema = registry.get(method).unwrap().schema();
            assert!(schema.undeclared_rule_fields().is_empty(), "{}", method);
        }
    }

    #[test]
    fn reply_envelopes() {
        assert_eq!(
            MethodReply::ok(json!({"score": 5.0})).to_json(),
            json!({"response": {"score": 5.0}, "code": 200})
        );
        let forbidden = MethodReply { payload: Value::Null, code: StatusCode::FORBIDDEN };
        assert_eq!(forbidden.to_json(), json!({"error": "Forbidden", "code": 403}));
    }
}
