//! Identity socket service — accepts requests and verifies their sender.
//!
//! The daemon answers exactly one kind of question, so each connection is
//! one request, one response. Before anything is read, the peer's
//! credentials are checked against the daemon's own: only a process running
//! as the same user is "this installation". Anything else is dropped
//! without a reply — the unauthorized requester's read simply never
//! resolves — and noted on stderr for diagnostics.

use std::cell::Cell;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::identity::protocol::{self, IdentityRequest, IdentityResponse, ShutdownAck};
use crate::identity::store::IdentityStore;


/// Socket filename inside the config directory.
pub const SOCKET_FILE: &str = "pm.sock";


/// Result of handling a single connection.
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// The request was answered.
    Answered,
    /// The sender was unauthorized; the connection was dropped silently.
    Ignored,
    /// A shutdown request was acknowledged; the daemon should stop.
    Shutdown,
}


/// Unix domain socket listener for the identity daemon.
pub struct IdentityService {
    listener: UnixListener,
    path: PathBuf,
    shutdown_requested: Cell<bool>,
}


impl IdentityService {
    /// Bind at the given path, removing any stale socket file first.
    pub fn bind(path: &Path) -> Result<IdentityService, String> {
        if path.exists() {
            std::fs::remove_file(path)
                .map_err(|e| format!("cannot remove stale socket {}: {}", path.display(), e))?;
        }
        let listener = UnixListener::bind(path)
            .map_err(|e| format!("cannot bind socket {}: {}", path.display(), e))?;
        Ok(IdentityService {
            listener,
            path: path.to_path_buf(),
            shutdown_requested: Cell::new(false),
        })
    }

    /// Bind the daemon's socket inside the config directory.
    pub fn start(config_dir: &Path) -> Result<IdentityService, String> {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| format!("cannot create {}: {}", config_dir.display(), e))?;
        IdentityService::bind(&config_dir.join(SOCKET_FILE))
    }

    /// Poll for one connection for up to `timeout_ms`, serving it if one
    /// arrives. Returns `Ok(true)` if a connection was handled, `Ok(false)`
    /// on timeout. A wire shutdown sets [`shutdown_requested`].
    ///
    /// [`shutdown_requested`]: IdentityService::shutdown_requested
    pub fn accept_nonblocking(
        &self,
        store: &IdentityStore,
        timeout_ms: u64,
    ) -> Result<bool, String> {
        self.listener
            .set_nonblocking(true)
            .map_err(|e| format!("failed to set non-blocking: {}", e))?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let poll_interval = Duration::from_millis(10);

        let result = loop {
            match self.listener.accept() {
                Ok((stream, _addr)) => {
                    match handle_connection(stream, store) {
                        Ok(HandleResult::Shutdown) => self.shutdown_requested.set(true),
                        Ok(_) => {}
                        Err(e) => eprintln!("pm daemon: request failed: {}", e),
                    }
                    break Ok(true);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        break Ok(false);
                    }
                    std::thread::sleep(poll_interval);
                }
                Err(e) => break Err(format!("accept failed: {}", e)),
            }
        };

        let _ = self.listener.set_nonblocking(false);
        result
    }

    /// Whether a wire shutdown request has been received.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.get()
    }

    /// Remove the socket file without consuming self.
    pub fn shutdown_ref(&self) {
        let _ = std::fs::remove_file(&self.path);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove a socket file from disk (static helper).
    pub fn cleanup(path: &Path) {
        let _ = std::fs::remove_file(path);
    }
}


/// Verify the peer, then serve one request.
fn handle_connection(stream: UnixStream, store: &IdentityStore) -> Result<HandleResult, String> {
    let authorized = match peer_uid(&stream) {
        Ok(uid) => uid == unsafe { libc::geteuid() },
        Err(_) => false,
    };
    serve_request(stream, store, authorized)
}


/// The post-verification half of connection handling, split out so tests
/// can exercise the unauthorized path directly.
fn serve_request(
    mut stream: UnixStream,
    store: &IdentityStore,
    authorized: bool,
) -> Result<HandleResult, String> {
    if !authorized {
        // No response at all; logged locally only.
        eprintln!("pm daemon: ignoring request from unauthorized sender");
        return Ok(HandleResult::Ignored);
    }

    // The listener may be in non-blocking mode; the conversation is not.
    let _ = stream.set_nonblocking(false);

    let request: IdentityRequest = protocol::read_json(&mut stream)?;
    match request {
        IdentityRequest::GetInstallationId => {
            let response = IdentityResponse {
                installation_id: store.get_or_create(),
            };
            protocol::write_json(&mut stream, &response)?;
            Ok(HandleResult::Answered)
        }
        IdentityRequest::Shutdown => {
            protocol::write_json(&mut stream, &ShutdownAck { stopping: true })?;
            Ok(HandleResult::Shutdown)
        }
    }
}


/// The uid of the process on the other end of a Unix stream (SO_PEERCRED).
fn peer_uid(stream: &UnixStream) -> Result<libc::uid_t, String> {
    let mut cred = libc::ucred {
        pid: 0,
        uid: 0,
        gid: 0,
    };
    let mut len = std::mem::size_of::<libc::ucred>() as libc::socklen_t;
    let ret = unsafe {
        libc::getsockopt(
            stream.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_PEERCRED,
            &mut cred as *mut libc::ucred as *mut libc::c_void,
            &mut len,
        )
    };
    if ret != 0 {
        return Err(format!(
            "SO_PEERCRED failed: {}",
            std::io::Error::last_os_error()
        ));
    }
    Ok(cred.uid)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_SEQ: AtomicU32 = AtomicU32::new(0);

    /// Short temp directory to stay under SUN_LEN for Unix sockets.
    fn test_dir() -> PathBuf {
        let seq = TEST_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("pms{}-{}", std::process::id(), seq));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }

    fn paired_streams() -> (UnixStream, UnixStream) {
        UnixStream::pair().expect("failed to create UnixStream pair")
    }

    #[test]
    fn bind_creates_and_cleanup_removes_socket() {
        let dir = test_dir();
        let sock = dir.join(SOCKET_FILE);

        let service = IdentityService::bind(&sock).unwrap();
        assert!(sock.exists());
        assert_eq!(service.path(), sock.as_path());

        service.shutdown_ref();
        assert!(!sock.exists());
        cleanup(&dir);
    }

    #[test]
    fn bind_replaces_stale_socket() {
        let dir = test_dir();
        let sock = dir.join(SOCKET_FILE);
        std::fs::write(&sock, "stale").unwrap();

        let service = IdentityService::bind(&sock).unwrap();
        service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn authorized_request_is_answered() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let (mut client, server) = paired_streams();

        protocol::write_json(&mut client, &IdentityRequest::GetInstallationId).unwrap();
        let result = serve_request(server, &store, true).unwrap();
        assert_eq!(result, HandleResult::Answered);

        let response: IdentityResponse = protocol::read_json(&mut client).unwrap();
        assert_eq!(response.installation_id.len(), 64);
        assert_eq!(response.installation_id, store.get_or_create());

        cleanup(&dir);
    }

    #[test]
    fn unauthorized_request_gets_no_response() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let (mut client, server) = paired_streams();

        protocol::write_json(&mut client, &IdentityRequest::GetInstallationId).unwrap();
        let result = serve_request(server, &store, false).unwrap();
        assert_eq!(result, HandleResult::Ignored);

        // The server closed the stream without writing; the requester's
        // read never yields a response.
        let read = protocol::read_json::<_, IdentityResponse>(&mut client);
        assert!(read.is_err());

        // And no identity was minted for the unauthorized peer.
        assert!(store.read().is_none());
        cleanup(&dir);
    }

    #[test]
    fn shutdown_request_is_acknowledged() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let (mut client, server) = paired_streams();

        protocol::write_json(&mut client, &IdentityRequest::Shutdown).unwrap();
        let result = serve_request(server, &store, true).unwrap();
        assert_eq!(result, HandleResult::Shutdown);

        let ack: ShutdownAck = protocol::read_json(&mut client).unwrap();
        assert!(ack.stopping);
        cleanup(&dir);
    }

    #[test]
    fn malformed_request_is_an_error() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let (mut client, server) = paired_streams();

        protocol::write_frame(&mut client, br#"{"action":"bogus"}"#).unwrap();
        let result = serve_request(server, &store, true);
        assert!(result.is_err());
        cleanup(&dir);
    }

    #[test]
    fn peer_uid_of_self_socketpair_matches_euid() {
        let (client, _server) = paired_streams();
        let uid = peer_uid(&client).unwrap();
        assert_eq!(uid, unsafe { libc::geteuid() });
    }

    #[test]
    fn accept_nonblocking_times_out_without_traffic() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let service = IdentityService::start(&dir).unwrap();

        let handled = service.accept_nonblocking(&store, 50).unwrap();
        assert!(!handled);
        assert!(!service.shutdown_requested());

        service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn accept_nonblocking_serves_a_real_connection() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let service = IdentityService::start(&dir).unwrap();
        let sock = service.path().to_path_buf();

        let client_thread = std::thread::spawn(move || {
            let mut stream = UnixStream::connect(&sock).unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            protocol::write_json(&mut stream, &IdentityRequest::GetInstallationId).unwrap();
            protocol::read_json::<_, IdentityResponse>(&mut stream).unwrap()
        });

        let handled = service.accept_nonblocking(&store, 5_000).unwrap();
        assert!(handled);

        let response = client_thread.join().unwrap();
        assert_eq!(response.installation_id.len(), 64);
        assert_eq!(response.installation_id, store.get_or_create());

        service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn wire_shutdown_sets_flag() {
        let dir = test_dir();
        let store = IdentityStore::new(&dir);
        let service = IdentityService::start(&dir).unwrap();
        let sock = service.path().to_path_buf();

        let client_thread = std::thread::spawn(move || {
            let mut stream = UnixStream::connect(&sock).unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            protocol::write_json(&mut stream, &IdentityRequest::Shutdown).unwrap();
            protocol::read_json::<_, ShutdownAck>(&mut stream).unwrap()
        });

        service.accept_nonblocking(&store, 5_000).unwrap();
        assert!(service.shutdown_requested());
        assert!(client_thread.join().unwrap().stopping);

        service.shutdown_ref();
        cleanup(&dir);
    }
}
