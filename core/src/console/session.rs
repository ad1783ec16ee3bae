//! Session and console — the state handed to every command handler.
//!
//! There is no ambient global console object. A [`Session`] is built once
//! at startup and passed by reference into the dispatcher and from there
//! into handlers; a [`Console`] bundles it with the registry behind the
//! single `process_input` entry point the frontend calls.

use crate::console::builtins;
use crate::console::dispatch;
use crate::console::output::{OutputLog, Palette};
use crate::console::registry::{CommandRegistry, CommandSpec};
use crate::remote::worker::RemoteHandle;


/// Everything a handler may touch: the page this console is attached to,
/// the installation identity (if one was obtainable), the styling palette,
/// the output log, and the channel remote work is submitted on.
pub struct Session {
    pub page_url: String,
    /// `None` when the identity daemon was unreachable or returned the
    /// error sentinel; anonymous actions still work.
    pub installation_id: Option<String>,
    pub palette: Palette,
    pub output: OutputLog,
    pub remote: RemoteHandle,
}


impl Session {
    pub fn new(page_url: &str, installation_id: Option<String>, remote: RemoteHandle) -> Self {
        Session {
            page_url: page_url.to_string(),
            installation_id,
            palette: Palette::default(),
            output: OutputLog::new(),
            remote,
        }
    }
}


/// The assembled console: registry plus session.
pub struct Console {
    registry: CommandRegistry,
    session: Session,
}


impl Console {
    /// Build a console with the builtin command set registered.
    pub fn new(session: Session) -> Self {
        let mut registry = CommandRegistry::new();
        builtins::register_builtins(&mut registry);
        Console { registry, session }
    }

    /// Build a console with an explicit registry (no builtins).
    pub fn with_registry(registry: CommandRegistry, session: Session) -> Self {
        Console { registry, session }
    }

    /// Register an additional command. Same contract as
    /// [`CommandRegistry::register`].
    pub fn register(&mut self, spec: CommandSpec) -> bool {
        self.registry.register(spec)
    }

    /// Process one line of user input. See [`dispatch::process_input`].
    pub fn process_input(&mut self, raw: &str) -> bool {
        dispatch::process_input(&self.registry, &mut self.session, raw)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
