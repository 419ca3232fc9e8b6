//! learngap — a learning-gap tutor.
//!
//! Library surface used by the `learngap` binary and the integration tests.

pub mod bootstrap;
pub mod core;
pub mod llm;
pub mod subsystems;

pub use bootstrap::logger;
pub use self::core::{config, error};
