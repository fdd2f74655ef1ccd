//! CLI Adapter
//!
//! Command-line interface for pump-stream.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, CurveCmd, QuoteArgs, QuoteCmd, StreamCmd};
