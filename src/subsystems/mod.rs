//! Subsystem modules for the tutor.

pub mod comms;
pub mod memory;
pub mod tutor;
