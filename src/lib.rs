pub mod analyzer;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod method;
pub mod store;
pub mod validation;

#[cfg(test)]
pub mod testing;
