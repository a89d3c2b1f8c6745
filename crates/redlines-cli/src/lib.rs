//! Redlines CLI library.
//!
//! Command implementations behind the `redline` binary: running a
//! comparison, preparing the native engine, and reporting where it lives.

pub mod commands;
pub mod json_output;
