use std::collections::HashSet;

use super::field::FieldKind;
use super::rules::CompositeRule;

/// Declaration of one named input of a request kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSpec {
    /// Optional, non-nullable field
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: false }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Ordered field list for one request kind, plus the kind's cross-field rules.
///
/// Built once through the builder methods and never mutated afterwards.
/// Field order only decides the order in which errors are reported.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: &'static str,
    fields: Vec<FieldSpec>,
    rules: Vec<CompositeRule>,
}

impl Schema {
    pub fn new(kind: &'static str) -> Self {
        Self { kind, fields: Vec::new(), rules: Vec::new() }
    }

    /// Append a field. Panics on a duplicate name: schemas are static
    /// declarations, so a duplicate is a programming error.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        assert!(
            self.fields.iter().all(|f| f.name != spec.name),
            "duplicate field '{}' in schema '{}'",
            spec.name,
            self.kind
        );
        self.fields.push(spec);
        self
    }

    pub fn rule(mut self, rule: CompositeRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn rules(&self) -> &[CompositeRule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Names referenced by rules that the schema does not declare
    pub fn undeclared_rule_fields(&self) -> Vec<&'static str> {
        let declared: HashSet<&str> = self.field_names().collect();
        self.rules
            .iter()
            .flat_map(CompositeRule::fields)
            .filter(|name| !declared.contains(name))
            .collect()
    }
}
