//! node-warden: list and safely terminate Node.js processes
//!
//! Selects processes by executable-name prefix, refuses to touch any whose
//! command line mentions a protected keyword, and terminates the rest with
//! SIGTERM followed by SIGKILL after a bounded wait.

pub mod cli;
pub mod config;
pub mod error;
pub mod killer;
pub mod policy;
pub mod privilege;
pub mod process_info;
pub mod protect;
pub mod session;
pub mod signal;

#[cfg(test)]
mod fake;
