//! Durable identity storage.
//!
//! The store owns two keys in the config directory: the installation
//! identity (written once, read forever) and the transient trigger flag
//! used by the console's double-tap activation. Identity storage never
//! fails loudly — when the directory cannot be written or read back, the
//! caller gets the `"ERR"` sentinel and carries on anonymously.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;


/// Returned when the identity cannot be persisted or read back. Callers
/// treat it as "no usable identity" and keep working.
pub const ERR_SENTINEL: &str = "ERR";

const IDENTITY_FILE: &str = "installation_id";
const TRIGGER_FILE: &str = "trigger_armed";


/// Mint a fresh identity: 32 bytes from the OS random source, rendered as
/// 64 lowercase hex characters, two fixed-width digits per byte.
pub fn generate_identity() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}


/// File-backed identity store rooted at a config directory.
pub struct IdentityStore {
    dir: PathBuf,
}


impl IdentityStore {
    pub fn new(dir: &Path) -> Self {
        IdentityStore {
            dir: dir.to_path_buf(),
        }
    }

    /// Return the installation identity, minting and persisting one on the
    /// first call. The value handed out is always what storage holds: a
    /// fresh identity is written and then read back, so a write that did
    /// not stick surfaces as the sentinel rather than a value that would
    /// vanish on the next call.
    pub fn get_or_create(&self) -> String {
        if let Some(id) = self.read() {
            return id;
        }

        let fresh = generate_identity();
        let _ = std::fs::create_dir_all(&self.dir);
        let _ = std::fs::write(self.identity_path(), &fresh);

        self.read().unwrap_or_else(|| ERR_SENTINEL.to_string())
    }

    /// The persisted identity, if any.
    pub fn read(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.identity_path()).ok()?;
        let id = raw.trim().to_string();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// Forget the persisted identity. Only the user/environment does this;
    /// the next `get_or_create` mints a new one.
    pub fn clear(&self) {
        let _ = std::fs::remove_file(self.identity_path());
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILE)
    }
}


/// The transient keypress-timing flag behind the console's double-tap
/// trigger. Armed by the first tap, consumed by the second if it lands
/// within the hold window; a stale flag reads as disarmed.
pub struct TriggerFlag {
    path: PathBuf,
    hold_ms: u64,
}


impl TriggerFlag {
    pub fn new(dir: &Path, hold_ms: u64) -> Self {
        TriggerFlag {
            path: dir.join(TRIGGER_FILE),
            hold_ms,
        }
    }

    /// Record the first tap.
    pub fn arm(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(&self.path, now_ms().to_string());
    }

    /// Clear the flag.
    pub fn disarm(&self) {
        let _ = std::fs::remove_file(&self.path);
    }

    /// Whether an un-expired first tap is pending. Expired flags are
    /// cleaned up on read.
    pub fn is_armed(&self) -> bool {
        let armed_at = match std::fs::read_to_string(&self.path) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => ms,
                Err(_) => {
                    self.disarm();
                    return false;
                }
            },
            Err(_) => return false,
        };
        if now_ms().saturating_sub(armed_at) > self.hold_ms {
            self.disarm();
            return false;
        }
        true
    }
}


fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
