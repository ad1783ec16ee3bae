//! pm — the command-line entry point for Pagemark.
//!
//! # Usage
//!
//! ```text
//! pm console https://example.org/article
//! pm daemon run
//! pm daemon stop
//! pm id
//! ```

use std::process;

use pagemark_core::cli::{parse_args, usage, CliCommand};
use pagemark_core::config::{self, Settings};
use pagemark_core::console::{Console, Session};
use pagemark_core::identity::client as identity_client;
use pagemark_core::identity::daemon::IdentityDaemon;
use pagemark_core::identity::ERR_SENTINEL;
use pagemark_core::remote::http::HttpRemote;
use pagemark_core::remote::worker::RemoteWorker;

use pm_tui::console::ConsoleApp;
use pm_tui::theme::Theme;


fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pm: {}", e);
            process::exit(1);
        }
    };

    let config_dir = config::config_dir();

    match cmd {
        CliCommand::Help => {
            println!("{}", usage());
        }
        CliCommand::DaemonRun => run_daemon(&config_dir),
        CliCommand::DaemonStop => {
            if let Err(e) = identity_client::stop_daemon(&config_dir, 5_000) {
                eprintln!("pm: daemon not stopped ({})", e);
                process::exit(1);
            }
        }
        CliCommand::Id => {
            match identity_client::fetch_installation_id(&config_dir, 10_000) {
                Ok(id) => println!("{}", id),
                Err(e) => {
                    eprintln!("pm: cannot obtain installation id: {}", e);
                    process::exit(1);
                }
            }
        }
        CliCommand::Console { url } => run_console(&config_dir, &url),
    }
}


/// Run the identity daemon in the foreground, tracking a pid file.
fn run_daemon(config_dir: &std::path::Path) {
    let _ = std::fs::create_dir_all(config_dir);
    let pid_path = config_dir.join("pm.pid");
    let _ = std::fs::write(&pid_path, std::process::id().to_string());

    match IdentityDaemon::new(config_dir) {
        Ok(mut daemon) => {
            if let Err(e) = daemon.run() {
                eprintln!("pm daemon: {}", e);
                let _ = std::fs::remove_file(&pid_path);
                process::exit(1);
            }
            let _ = std::fs::remove_file(&pid_path);
        }
        Err(e) => {
            eprintln!("pm daemon: failed to start: {}", e);
            let _ = std::fs::remove_file(&pid_path);
            process::exit(1);
        }
    }
}


/// Assemble settings, identity, remote worker, and the TUI, then run.
fn run_console(config_dir: &std::path::Path, url: &str) {
    let settings = match Settings::load_or_default(config_dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("pm: {}", e);
            process::exit(1);
        }
    };

    // Identity bootstrap. Failure (or the error sentinel) degrades to an
    // anonymous session — the console still works.
    let installation_id =
        match identity_client::fetch_installation_id(config_dir, settings.request_timeout_ms) {
            Ok(id) if id != ERR_SENTINEL => Some(id),
            Ok(_) => None,
            Err(e) => {
                eprintln!("pm: identity unavailable ({}), continuing anonymously", e);
                None
            }
        };

    let remote = match HttpRemote::new(&settings.service_url, settings.request_timeout_ms) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("pm: {}", e);
            process::exit(1);
        }
    };

    let (handle, outcomes, worker) = RemoteWorker::spawn(Box::new(remote));
    let session = Session::new(url, installation_id, handle);
    let console = Console::new(session);
    let theme = Theme::by_name(&settings.theme);

    let result = match ConsoleApp::new(console, outcomes, theme) {
        Ok(mut app) => app.run(),
        Err(e) => {
            eprintln!("pm: failed to start console: {}", e);
            process::exit(1);
        }
    };

    // The app (and with it the session's remote handle) is gone; the
    // worker's job loop ends and can be reaped.
    worker.join();

    if let Err(e) = result {
        eprintln!("pm: {}", e);
        process::exit(1);
    }
}
