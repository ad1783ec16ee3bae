//! Parse `pm` process arguments into a typed command.
//!
//! This is the *process* surface, distinct from the console's own command
//! line: `pm console <url>` opens the console, everything else manages the
//! identity daemon or prints information.
//!
//! Arguments are expected WITHOUT the program name (i.e., `args` should be
//! `["console", "https://..."]`, not `["pm", "console", ...]`).


/// A parsed `pm` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Open the console attached to a page URL.
    Console { url: String },
    /// Run the identity daemon in the foreground.
    DaemonRun,
    /// Ask a running daemon to stop.
    DaemonStop,
    /// Print the installation identifier.
    Id,
    /// Print usage.
    Help,
}


pub fn parse_args(args: &[&str]) -> Result<CliCommand, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'pm help' for usage.".into());
    }

    match args[0] {
        "console" => parse_console(args),
        "daemon" => parse_daemon(args),
        "id" => Ok(CliCommand::Id),
        "help" => Ok(CliCommand::Help),
        _ => Err(format!("Unknown command: '{}'", args[0])),
    }
}


/// `pm console <url>`
fn parse_console(args: &[&str]) -> Result<CliCommand, String> {
    if args.len() < 2 {
        return Err("Usage: pm console <url>".into());
    }
    Ok(CliCommand::Console {
        url: args[1].into(),
    })
}


/// `pm daemon <run|stop>`
fn parse_daemon(args: &[&str]) -> Result<CliCommand, String> {
    if args.len() < 2 {
        return Err("Usage: pm daemon <run|stop>".into());
    }
    match args[1] {
        "run" => Ok(CliCommand::DaemonRun),
        "stop" => Ok(CliCommand::DaemonStop),
        _ => Err(format!("Unknown daemon subcommand: '{}'", args[1])),
    }
}


/// The usage text printed by `pm help`.
pub fn usage() -> String {
    [
        "pm — page bookmarking and annotation console",
        "",
        "Usage:",
        "  pm console <url>   open the command console for a page",
        "  pm daemon run      run the identity daemon in the foreground",
        "  pm daemon stop     stop a running identity daemon",
        "  pm id              print the installation identifier",
        "  pm help            show this help",
        "",
        "Inside the console, type 'help' for the command list.",
    ]
    .join("\n")
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
