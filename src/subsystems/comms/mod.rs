//! Comms subsystem — the terminal front end.
//!
//! The console is the only channel: it reads lines, parses them into
//! [`Command`](crate::subsystems::tutor::commands::Command)s, hands them to the
//! [`Tutor`](crate::subsystems::tutor::Tutor) and prints the replies. It runs on
//! the main task until `/exit`, end of input, or the shutdown token fires.

pub mod console;

pub use console::{render, run_console, run_lines};
