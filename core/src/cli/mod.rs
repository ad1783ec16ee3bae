//! Process CLI parsing for the `pm` binary.

pub mod parse;

pub use parse::{parse_args, usage, CliCommand};
