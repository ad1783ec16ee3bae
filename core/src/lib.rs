//! Pagemark core — the command console engine.
//!
//! This crate holds everything behind the console surface: the ordered
//! command registry and dispatcher, the output log handlers write to, the
//! builtin commands, the remote annotation-service client and its worker
//! thread, and the installation-identity store with its daemon, socket
//! protocol, and client.
//!
//! Frontends (the `pm` binary and the TUI crate) only assemble these parts;
//! no console logic lives outside this crate.

pub mod cli;
pub mod config;
pub mod console;
pub mod identity;
pub mod remote;
