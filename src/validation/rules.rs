use std::collections::HashMap;

use super::field::FieldValue;

/// Cross-field invariant checked after every individual field passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeRule {
    /// At least one of the pairs must have both members present
    AnyPairPresent {
        message: &'static str,
        pairs: Vec<(&'static str, &'static str)>,
    },
}

impl CompositeRule {
    pub fn any_pair(message: &'static str, pairs: &[(&'static str, &'static str)]) -> Self {
        CompositeRule::AnyPairPresent { message, pairs: pairs.to_vec() }
    }

    /// Every field name the rule looks at
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            CompositeRule::AnyPairPresent { pairs, .. } => {
                pairs.iter().flat_map(|(a, b)| [*a, *b]).collect()
            }
        }
    }

    /// Returns the rule's message when the stored values violate it
    pub fn check(&self, values: &HashMap<&'static str, FieldValue>) -> Option<&'static str> {
        let present = |name: &str| values.get(name).is_some_and(FieldValue::is_present);
        match self {
            CompositeRule::AnyPairPresent { message, pairs } => {
                let satisfied = pairs.iter().any(|(a, b)| present(*a) && present(*b));
                (!satisfied).then_some(*message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field::Gender;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn rule() -> CompositeRule {
        CompositeRule::any_pair("need a pair", &[("phone", "email"), ("gender", "birthday")])
    }

    #[test]
    fn satisfied_by_any_complete_pair() {
        let mut values = HashMap::new();
        values.insert("gender", FieldValue::Gender(Gender::Unknown));
        values.insert("birthday", FieldValue::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
        assert_eq!(rule().check(&values), None);
    }

    #[test]
    fn half_pairs_and_empty_values_do_not_count() {
        let mut values = HashMap::new();
        values.insert("phone", FieldValue::Text("79175002040".into()));
        values.insert("email", FieldValue::Raw(Value::String(String::new())));
        values.insert("gender", FieldValue::Gender(Gender::Male));
        assert_eq!(rule().check(&values), Some("need a pair"));
    }

    #[test]
    fn lists_every_referenced_field() {
        assert_eq!(rule().fields(), vec!["phone", "email", "gender", "birthday"]);
    }
}
