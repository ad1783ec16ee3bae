//! Dispatcher — matches raw input against the registry and runs handlers.
//!
//! Dispatch is deliberately dumb: it does not parse, tokenize, or route.
//! Every registration's `test` sees every input, every match executes, and
//! nothing short-circuits. The return value only says whether *some*
//! handler was invoked; handlers that kick off remote calls finish on
//! their own time.

use crate::console::output::OutputSink;
use crate::console::registry::CommandRegistry;
use crate::console::session::Session;


/// Line written when no registration matched.
pub const NOT_RECOGNIZED: &str = "Command not recognized. Type 'help' for available commands.";


/// Process one line of user input.
///
/// - Empty or whitespace-only input: returns `false` with no side effects.
/// - Otherwise the raw input is echoed first (`$ ` marker, echo color, no
///   trailing blank), then tested against every registration in
///   registration order, passing both the raw line and the trimmed,
///   lowercased form. Every match executes.
/// - Zero matches: one warning line, returns `false`.
/// - One or more matches: returns `true`.
pub fn process_input(registry: &CommandRegistry, session: &mut Session, raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }

    let echo_color = session.palette.echo;
    session
        .output
        .write_all(&[format!("$ {}", raw)], Some(echo_color), true);

    let normalized = raw.trim().to_lowercase();

    let mut matched = false;
    for entry in registry.entries() {
        if entry.matches(raw, &normalized) {
            entry.run(raw, &normalized, registry, session);
            matched = true;
        }
    }

    if !matched {
        let warning = session.palette.warning;
        session.output.write_line(NOT_RECOGNIZED, Some(warning));
        return false;
    }
    true
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
