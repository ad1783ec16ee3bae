//! Command registry — the ordered set of registered command shapes.
//!
//! A command is a pair of closures: `test` decides whether a raw input line
//! is meant for this command, `execute` runs it. Registration order is
//! semantically meaningful: it is the order in which inputs are tested and
//! in which multiple matching commands execute. Nothing is ever
//! unregistered, and the same usage may be registered more than once —
//! every entry is considered for every dispatch.

use crate::console::session::Session;


/// Decides whether an input line matches. Receives the raw line and the
/// trimmed, lowercased form.
pub type TestFn = Box<dyn Fn(&str, &str) -> bool>;

/// Runs a matched command. Receives the raw line, the normalized form, the
/// registry (for commands like `help` that describe the command set), and
/// the session to write output and submit remote work through.
pub type ExecFn = Box<dyn Fn(&str, &str, &CommandRegistry, &mut Session)>;


/// A registration candidate. `test` and `execute` are optional here so that
/// an incomplete record can be *rejected* at registration time instead of
/// being unrepresentable; [`CommandRegistry::register`] refuses any spec
/// missing either one.
pub struct CommandSpec {
    pub usage: String,
    pub description: String,
    pub test: Option<TestFn>,
    pub execute: Option<ExecFn>,
}


impl CommandSpec {
    /// Start a spec with no behavior attached.
    pub fn new(usage: &str, description: &str) -> Self {
        CommandSpec {
            usage: usage.to_string(),
            description: description.to_string(),
            test: None,
            execute: None,
        }
    }

    /// Attach the match predicate.
    pub fn test(mut self, f: impl Fn(&str, &str) -> bool + 'static) -> Self {
        self.test = Some(Box::new(f));
        self
    }

    /// Attach the handler body.
    pub fn execute(mut self, f: impl Fn(&str, &str, &CommandRegistry, &mut Session) + 'static) -> Self {
        self.execute = Some(Box::new(f));
        self
    }
}


/// A validated registration. Immutable once inserted; lives for the rest of
/// the process.
pub struct Registration {
    pub usage: String,
    pub description: String,
    test: TestFn,
    execute: ExecFn,
}


impl Registration {
    pub fn matches(&self, raw: &str, normalized: &str) -> bool {
        (self.test)(raw, normalized)
    }

    pub fn run(&self, raw: &str, normalized: &str, registry: &CommandRegistry, session: &mut Session) {
        (self.execute)(raw, normalized, registry, session);
    }
}


/// Ordered, append-only collection of registrations.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<Registration>,
}


impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry::default()
    }

    /// Register a command. Returns `false` (and inserts nothing) when the
    /// spec is missing its `test` or `execute` closure; `true` otherwise.
    /// Duplicate usages are not deduplicated.
    pub fn register(&mut self, spec: CommandSpec) -> bool {
        let (test, execute) = match (spec.test, spec.execute) {
            (Some(t), Some(e)) => (t, e),
            _ => return false,
        };
        self.entries.push(Registration {
            usage: spec.usage,
            description: spec.description,
            test,
            execute,
        });
        true
    }

    /// All registrations, in registration order.
    pub fn entries(&self) -> &[Registration] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
