pub mod analyze;
pub mod call;
pub mod serve;
pub mod token;
