// Declarative request validation: field kinds, schemas, composite rules
// and the clean-once pipeline that collects every error.

pub mod field;
pub mod request;
pub mod rules;
pub mod schema;

pub use field::{FieldError, FieldKind, FieldValue, Gender};
pub use request::ValidatedRequest;
pub use rules::CompositeRule;
pub use schema::{FieldSpec, Schema};
