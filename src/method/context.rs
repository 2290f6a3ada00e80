use serde_json::{Map, Value};

/// Call-scoped audit sink. Handlers record facts about the call here; the
/// transport logs the result. Never part of the response payload.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Map<String, Value>,
}

impl Context {
    pub fn new(request_id: impl Into<String>) -> Self {
        let mut ctx = Self::default();
        ctx.insert("request_id", Value::String(request_id.into()));
        ctx
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.get("request_id").and_then(Value::as_str)
    }

    /// Merge the response envelope in, for the closing log line
    pub fn merge(&mut self, other: &Value) {
        if let Value::Object(map) = other {
            for (k, v) in map {
                self.entries.insert(k.clone(), v.clone());
            }
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_entries_and_request_id() {
        let mut ctx = Context::new("abc");
        ctx.insert("nclients", 3);
        ctx.insert("has", json!(["phone", "email"]));

        assert_eq!(ctx.request_id(), Some("abc"));
        assert_eq!(ctx.get("nclients"), Some(&json!(3)));
        assert_eq!(ctx.to_value(), json!({"request_id": "abc", "nclients": 3, "has": ["phone", "email"]}));
    }

    #[test]
    fn merge_overlays_response_fields() {
        let mut ctx = Context::new("abc");
        ctx.merge(&json!({"code": 200, "response": {"score": 5.0}}));
        assert_eq!(ctx.get("code"), Some(&json!(200)));
        assert_eq!(ctx.request_id(), Some("abc"));
    }
}
