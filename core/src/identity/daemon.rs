//! Identity daemon — the event loop owning the store and socket service.
//!
//! Single-threaded: the tick drains in-process control events, then polls
//! the socket. The identity is minted eagerly at startup so that the very
//! first console request is answered from cache.

use std::path::Path;
use std::sync::mpsc;

use crate::identity::service::IdentityService;
use crate::identity::store::IdentityStore;


/// In-process control events for the daemon loop.
#[derive(Debug)]
pub enum DaemonEvent {
    /// A diagnostic message to log (no state change).
    Log { message: String },
    /// Stop the loop.
    Shutdown,
}


/// Loop configuration.
pub struct DaemonConfig {
    /// How long each tick waits for socket connections (milliseconds).
    pub socket_poll_ms: u64,
}


impl Default for DaemonConfig {
    fn default() -> Self {
        DaemonConfig { socket_poll_ms: 50 }
    }
}


/// Handle for sending control events from other threads.
#[derive(Clone)]
pub struct DaemonHandle {
    sender: mpsc::Sender<DaemonEvent>,
}


impl DaemonHandle {
    pub fn log(&self, message: &str) -> Result<(), String> {
        self.sender
            .send(DaemonEvent::Log {
                message: message.to_string(),
            })
            .map_err(|e| format!("channel send failed: {}", e))
    }

    pub fn shutdown(&self) -> Result<(), String> {
        self.sender
            .send(DaemonEvent::Shutdown)
            .map_err(|e| format!("channel send failed: {}", e))
    }
}


/// The identity daemon.
pub struct IdentityDaemon {
    store: IdentityStore,
    service: IdentityService,
    receiver: mpsc::Receiver<DaemonEvent>,
    handle: DaemonHandle,
    config: DaemonConfig,
}


impl IdentityDaemon {
    pub fn new(config_dir: &Path) -> Result<IdentityDaemon, String> {
        Self::with_config(config_dir, DaemonConfig::default())
    }

    pub fn with_config(config_dir: &Path, config: DaemonConfig) -> Result<IdentityDaemon, String> {
        let store = IdentityStore::new(config_dir);
        let service = IdentityService::start(config_dir)?;
        let (sender, receiver) = mpsc::channel();
        let handle = DaemonHandle { sender };

        // Prime the cache at install/start time; failures degrade to the
        // sentinel on the request path.
        let _ = store.get_or_create();

        Ok(IdentityDaemon {
            store,
            service,
            receiver,
            handle,
            config,
        })
    }

    /// A handle for sending control events to this daemon.
    pub fn handle(&self) -> DaemonHandle {
        self.handle.clone()
    }

    /// Run the loop until shutdown, then remove the socket.
    pub fn run(&mut self) -> Result<(), String> {
        loop {
            if self.tick() {
                break;
            }
        }
        self.service.shutdown_ref();
        Ok(())
    }

    /// One tick: drain control events, then poll the socket.
    /// Returns true when shutdown was requested.
    pub fn tick(&mut self) -> bool {
        if self.drain_channel() {
            return true;
        }

        if let Err(e) = self
            .service
            .accept_nonblocking(&self.store, self.config.socket_poll_ms)
        {
            eprintln!("pm daemon: socket error: {}", e);
        }

        self.service.shutdown_requested()
    }

    /// Drain all pending control events. Returns true on Shutdown.
    fn drain_channel(&mut self) -> bool {
        loop {
            match self.receiver.try_recv() {
                Ok(DaemonEvent::Log { message }) => {
                    eprintln!("pm daemon: {}", message);
                }
                Ok(DaemonEvent::Shutdown) => return true,
                Err(mpsc::TryRecvError::Empty) => return false,
                Err(mpsc::TryRecvError::Disconnected) => {
                    eprintln!("pm daemon: channel disconnected, shutting down");
                    return true;
                }
            }
        }
    }

    /// Borrow the store (testing).
    pub fn store(&self) -> &IdentityStore {
        &self.store
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::service::SOCKET_FILE;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_SEQ: AtomicU32 = AtomicU32::new(0);

    fn test_dir() -> PathBuf {
        let seq = TEST_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("pmd{}-{}", std::process::id(), seq));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }

    fn fast_config() -> DaemonConfig {
        DaemonConfig { socket_poll_ms: 10 }
    }

    #[test]
    fn new_creates_socket_and_primes_identity() {
        let dir = test_dir();
        let daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();

        assert!(dir.join(SOCKET_FILE).exists());
        // Identity was minted eagerly.
        let id = daemon.store().read().expect("identity primed at startup");
        assert_eq!(id.len(), 64);

        daemon.service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn handle_shutdown_stops_tick() {
        let dir = test_dir();
        let mut daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();
        let handle = daemon.handle();

        handle.shutdown().unwrap();
        assert!(daemon.tick());

        daemon.service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn tick_without_traffic_keeps_running() {
        let dir = test_dir();
        let mut daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();
        assert!(!daemon.tick());
        daemon.service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn log_event_does_not_stop_the_loop() {
        let dir = test_dir();
        let mut daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();
        daemon.handle().log("hello from a test").unwrap();
        assert!(!daemon.tick());
        daemon.service.shutdown_ref();
        cleanup(&dir);
    }

    #[test]
    fn run_stops_on_shutdown_and_removes_socket() {
        let dir = test_dir();
        let mut daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();
        let handle = daemon.handle();

        handle.shutdown().unwrap();
        daemon.run().unwrap();

        assert!(
            !dir.join(SOCKET_FILE).exists(),
            "socket removed after run()"
        );
        cleanup(&dir);
    }

    #[test]
    fn handle_from_thread() {
        let dir = test_dir();
        let mut daemon = IdentityDaemon::with_config(&dir, fast_config()).unwrap();
        let handle = daemon.handle();

        let thread = std::thread::spawn(move || {
            handle.shutdown().unwrap();
        });
        thread.join().unwrap();

        assert!(daemon.tick());
        daemon.service.shutdown_ref();
        cleanup(&dir);
    }
}
