//! Identity client — the console side of the cross-context request.
//!
//! `fetch_installation_id` transparently manages the daemon's lifecycle:
//! if it is not running it is started, if it is wedged it is restarted.
//! The request itself serves as the liveness check — there is no separate
//! ping protocol.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::identity::protocol::{self, IdentityRequest, IdentityResponse, ShutdownAck};
use crate::identity::service::SOCKET_FILE;

const LOCK_FILE: &str = "pm.lock";
const PID_FILE: &str = "pm.pid";
const LOG_FILE: &str = "daemon.log";


/// Ask the identity daemon for the installation id, starting it if needed.
///
/// Fast path: one request to an already-running daemon. Recovery path:
/// take the startup lock, kill a stale daemon if its pid file points at a
/// live process, clean up, spawn `pm daemon run`, wait for the socket, and
/// retry the request.
pub fn fetch_installation_id(config_dir: &Path, timeout_ms: u64) -> Result<String, String> {
    if let Ok(id) = request_installation_id(config_dir, timeout_ms) {
        return Ok(id);
    }

    let lock_path = config_dir.join(LOCK_FILE);
    let _lock = acquire_lock(&lock_path, 10_000)?;

    // Another process may have started the daemon while we waited.
    if let Ok(id) = request_installation_id(config_dir, timeout_ms) {
        return Ok(id);
    }

    // Kill a stale daemon if one is recorded.
    let pid_path = config_dir.join(PID_FILE);
    if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
        if let Ok(pid) = pid_str.trim().parse::<u32>() {
            if is_pid_alive(pid) {
                kill_pid(pid);
                std::thread::sleep(Duration::from_millis(200));
            }
        }
        let _ = std::fs::remove_file(&pid_path);
    }

    let _ = std::fs::remove_file(config_dir.join(SOCKET_FILE));

    start_daemon_process(config_dir)?;
    wait_for_socket(config_dir, 5_000)?;

    request_installation_id(config_dir, timeout_ms)
        .map_err(|e| format!("daemon started but request failed: {}", e))
}


/// One identity request against a running daemon.
pub fn request_installation_id(config_dir: &Path, timeout_ms: u64) -> Result<String, String> {
    let mut stream = connect(config_dir, timeout_ms)?;
    protocol::write_json(&mut stream, &IdentityRequest::GetInstallationId)?;
    let response: IdentityResponse = protocol::read_json(&mut stream)?;
    Ok(response.installation_id)
}


/// Ask a running daemon to stop. Absent daemon is not an error worth more
/// than its message; the caller decides what to print.
pub fn stop_daemon(config_dir: &Path, timeout_ms: u64) -> Result<(), String> {
    let mut stream = connect(config_dir, timeout_ms)?;
    protocol::write_json(&mut stream, &IdentityRequest::Shutdown)?;
    let _ack: ShutdownAck = protocol::read_json(&mut stream)?;
    Ok(())
}


fn connect(config_dir: &Path, timeout_ms: u64) -> Result<UnixStream, String> {
    let sock_path = config_dir.join(SOCKET_FILE);
    let stream = UnixStream::connect(&sock_path)
        .map_err(|e| format!("cannot connect to {}: {}", sock_path.display(), e))?;
    stream
        .set_read_timeout(Some(Duration::from_millis(timeout_ms)))
        .map_err(|e| format!("cannot set timeout: {}", e))?;
    Ok(stream)
}


/// File-lock guard that releases the lock on drop.
#[derive(Debug)]
struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}


impl Drop for LockGuard {
    fn drop(&mut self) {
        unsafe {
            libc::flock(
                std::os::unix::io::AsRawFd::as_raw_fd(&self.file),
                libc::LOCK_UN,
            );
        }
        let _ = std::fs::remove_file(&self.path);
    }
}


/// Acquire an exclusive file lock, polling up to the timeout.
fn acquire_lock(lock_path: &Path, timeout_ms: u64) -> Result<LockGuard, String> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)
        .map_err(|e| format!("cannot create lock file {}: {}", lock_path.display(), e))?;

    let fd = std::os::unix::io::AsRawFd::as_raw_fd(&file);
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);

    loop {
        let ret = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
        if ret == 0 {
            return Ok(LockGuard {
                file,
                path: lock_path.to_path_buf(),
            });
        }
        if Instant::now() >= deadline {
            return Err(format!(
                "timed out acquiring lock {} after {}ms",
                lock_path.display(),
                timeout_ms
            ));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}


/// Start the daemon as a detached background process.
///
/// Spawns `<current_exe> daemon run` with `PM_CONFIG_DIR` set, logging to
/// `daemon.log`. Returns the child pid.
fn start_daemon_process(config_dir: &Path) -> Result<u32, String> {
    let exe = std::env::current_exe()
        .map_err(|e| format!("cannot determine current executable: {}", e))?;

    let log_path = config_dir.join(LOG_FILE);
    let log_file = std::fs::File::create(&log_path)
        .map_err(|e| format!("cannot create {}: {}", log_path.display(), e))?;
    let log_stderr = log_file
        .try_clone()
        .map_err(|e| format!("cannot clone log file handle: {}", e))?;

    let child = std::process::Command::new(&exe)
        .args(["daemon", "run"])
        .env("PM_CONFIG_DIR", config_dir)
        .stdout(log_file)
        .stderr(log_stderr)
        .spawn()
        .map_err(|e| format!("cannot spawn daemon: {}", e))?;

    Ok(child.id())
}


/// Wait for the daemon socket to appear and accept a connection, with
/// exponential backoff capped at 200ms.
fn wait_for_socket(config_dir: &Path, timeout_ms: u64) -> Result<(), String> {
    let sock_path = config_dir.join(SOCKET_FILE);
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    let mut interval = Duration::from_millis(25);

    loop {
        if sock_path.exists() && UnixStream::connect(&sock_path).is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(format!(
                "timed out waiting for daemon socket at {} ({}ms)",
                sock_path.display(),
                timeout_ms,
            ));
        }
        std::thread::sleep(interval);
        interval = std::cmp::min(interval * 2, Duration::from_millis(200));
    }
}


/// Check whether a process with the given pid is alive.
fn is_pid_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}


/// Kill a process: SIGTERM, brief grace, then SIGKILL if still alive.
fn kill_pid(pid: u32) {
    let pid = pid as libc::pid_t;
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
    std::thread::sleep(Duration::from_millis(500));
    if unsafe { libc::kill(pid, 0) } == 0 {
        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
