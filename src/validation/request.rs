use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::field::{is_empty_value, FieldValue, Gender};
use super::schema::Schema;

/// One incoming request bound to its schema.
///
/// Cleaning is lazy and runs at most once: the first call to
/// [`ValidatedRequest::is_valid`] walks every field, records every error,
/// applies composite rules and memoizes the outcome.
#[derive(Debug)]
pub struct ValidatedRequest<'s> {
    schema: &'s Schema,
    raw: Value,
    errors: Vec<String>,
    values: HashMap<&'static str, FieldValue>,
    cleaned: bool,
}

impl<'s> ValidatedRequest<'s> {
    pub fn new(schema: &'s Schema, raw: Value) -> Self {
        Self {
            schema,
            raw,
            errors: Vec::new(),
            values: HashMap::new(),
            cleaned: false,
        }
    }

    pub fn is_valid(&mut self) -> bool {
        if !self.cleaned {
            self.clean();
        }
        self.errors.is_empty()
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    fn clean(&mut self) {
        let schema = self.schema;
        for spec in schema.fields() {
            // A non-object payload has no fields at all
            let Some(value) = self.raw.get(spec.name) else {
                if spec.required {
                    self.errors.push(format!("{} field not found", spec.name));
                }
                continue;
            };

            if is_empty_value(value) {
                if spec.nullable {
                    self.values.insert(spec.name, FieldValue::Raw(value.clone()));
                } else {
                    self.errors.push(format!("{} field is empty", spec.name));
                }
                continue;
            }

            match spec.kind.validate(value) {
                Ok(Some(typed)) => {
                    self.values.insert(spec.name, typed);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!("{}.{} rejected: {}", schema.kind(), spec.name, err);
                    self.errors.push(format!("{} field validation error", spec.name));
                }
            }
        }

        if self.errors.is_empty() {
            for rule in schema.rules() {
                if let Some(message) = rule.check(&self.values) {
                    self.errors.push(message.to_string());
                }
            }
        }

        self.cleaned = true;
    }

    /// Errors recorded so far, in schema order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All errors joined for display
    pub fn error_message(&self) -> String {
        self.errors.join(", ")
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Whether the field was supplied with a non-empty value
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_present)
    }

    /// Declared fields supplied with a non-empty value, in schema order
    pub fn present_fields(&self) -> Vec<&'static str> {
        self.schema.field_names().filter(|name| self.has(name)).collect()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(FieldValue::as_date)
    }

    pub fn gender(&self, name: &str) -> Option<Gender> {
        self.get(name).and_then(FieldValue::as_gender)
    }

    pub fn client_ids(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(FieldValue::as_client_ids)
    }

    pub fn mapping(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(FieldValue::as_mapping)
    }
}
