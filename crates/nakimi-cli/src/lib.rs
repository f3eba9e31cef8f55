//! Nakimi CLI library.
//!
//! Command handlers, configuration loading, terminal styling and output
//! formatting for the `nakimi-cli` binary.

pub mod commands;
pub mod config;
pub mod output;
pub mod terminal;
