pub mod context;
pub mod dispatcher;
pub mod envelope;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use envelope::{MethodEnvelope, METHOD_SCHEMA};
