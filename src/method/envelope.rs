use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::{FieldKind, FieldSpec, Schema, ValidatedRequest};

/// Outer request every method call arrives in
pub static METHOD_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("method")
        .field(FieldSpec::new("account", FieldKind::Text).nullable())
        .field(FieldSpec::new("login", FieldKind::Text).required().nullable())
        .field(FieldSpec::new("token", FieldKind::Text).required().nullable())
        .field(FieldSpec::new("arguments", FieldKind::Mapping).required().nullable())
        .field(FieldSpec::new("method", FieldKind::Text).required())
});

/// A validated method envelope
#[derive(Debug)]
pub struct MethodEnvelope {
    request: ValidatedRequest<'static>,
    is_admin: bool,
}

impl MethodEnvelope {
    /// Wrap an already validated envelope request
    pub fn new(request: ValidatedRequest<'static>, admin_login: &str) -> Self {
        let is_admin = request.text("login") == Some(admin_login);
        Self { request, is_admin }
    }

    /// Validate a raw body against the method schema
    pub fn parse(body: Value, admin_login: &str) -> Result<Self, ApiError> {
        let mut request = ValidatedRequest::new(&METHOD_SCHEMA, body);
        if !request.is_valid() {
            return Err(ApiError::invalid_request(request.error_message()));
        }
        Ok(Self::new(request, admin_login))
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Missing or null account reads as the empty string
    pub fn account(&self) -> &str {
        self.request.text("account").unwrap_or_default()
    }

    pub fn login(&self) -> &str {
        self.request.text("login").unwrap_or_default()
    }

    pub fn token(&self) -> &str {
        self.request.text("token").unwrap_or_default()
    }

    pub fn method(&self) -> &str {
        self.request.text("method").unwrap_or_default()
    }

    /// Method arguments; an empty or null mapping reads as `{}`
    pub fn arguments(&self) -> Value {
        let arguments = self.request.mapping("arguments").cloned().unwrap_or_else(Map::new);
        Value::Object(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_envelope_exposes_fields() {
        let envelope = MethodEnvelope::parse(
            json!({
                "account": "h&f",
                "login": "h&f",
                "method": "online_score",
                "token": "abc",
                "arguments": {"phone": "79175002040"}
            }),
            "admin",
        )
        .unwrap();

        assert_eq!(envelope.account(), "h&f");
        assert_eq!(envelope.login(), "h&f");
        assert_eq!(envelope.token(), "abc");
        assert_eq!(envelope.method(), "online_score");
        assert_eq!(envelope.arguments(), json!({"phone": "79175002040"}));
        assert!(!envelope.is_admin());
    }

    #[test]
    fn nullable_fields_may_be_empty() {
        let envelope = MethodEnvelope::parse(
            json!({"login": "admin", "method": "online_score", "token": "", "arguments": {}}),
            "admin",
        )
        .unwrap();
        assert!(envelope.is_admin());
        assert_eq!(envelope.account(), "");
        assert_eq!(envelope.token(), "");
        assert_eq!(envelope.arguments(), json!({}));
    }

    #[test]
    fn invalid_envelope_reports_every_problem() {
        let err = MethodEnvelope::parse(json!({"login": 5, "method": "", "arguments": []}), "admin").unwrap_err();
        assert_eq!(
            err,
            ApiError::invalid_request("login field validation error, token field not found, method field is empty")
        );
    }

    #[test]
    fn arguments_must_be_a_mapping() {
        let err = MethodEnvelope::parse(
            json!({"login": "a", "method": "m", "token": "t", "arguments": [1]}),
            "admin",
        )
        .unwrap_err();
        assert_eq!(err, ApiError::invalid_request("arguments field validation error"));
    }
}
