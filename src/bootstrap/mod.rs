//! Bootstrap layer — modules that run before the tutor starts.
//!
//! - **logger** — tracing-subscriber initialisation.

pub mod logger;
