//! Identity wire protocol — action-tagged JSON over length-prefixed frames.
//!
//! # Wire format
//!
//! Every message is a 4-byte big-endian length followed by that many bytes
//! of JSON. Requests carry an `"action"` discriminant:
//!
//! ```json
//! {"action": "get_installation_id"}
//! {"action": "shutdown"}
//! ```
//!
//! The identity answer is `{"installation_id": "<64 hex chars>"}`; the
//! shutdown acknowledgement is `{"stopping": true}`. An unauthorized
//! request gets no reply at all — the connection is simply closed.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};


/// Frames above this size are rejected as malformed.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;


/// A request to the identity daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum IdentityRequest {
    /// Ask for the installation identifier, minting one if needed.
    #[serde(rename = "get_installation_id")]
    GetInstallationId,

    /// Ask the daemon to shut down gracefully.
    #[serde(rename = "shutdown")]
    Shutdown,
}


/// The answer to [`IdentityRequest::GetInstallationId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub installation_id: String,
}


/// The answer to [`IdentityRequest::Shutdown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutdownAck {
    pub stopping: bool,
}


/// Write one length-prefixed frame.
pub fn write_frame<W: Write>(stream: &mut W, payload: &[u8]) -> Result<(), String> {
    let len = payload.len() as u32;
    stream
        .write_all(&len.to_be_bytes())
        .map_err(|e| format!("failed to write frame length: {}", e))?;
    stream
        .write_all(payload)
        .map_err(|e| format!("failed to write frame payload: {}", e))?;
    stream
        .flush()
        .map_err(|e| format!("failed to flush: {}", e))?;
    Ok(())
}


/// Read one length-prefixed frame. Empty and oversized frames are errors.
pub fn read_frame<R: Read>(stream: &mut R) -> Result<Vec<u8>, String> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .map_err(|e| format!("failed to read frame length: {}", e))?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len == 0 {
        return Err("empty frame".into());
    }
    if len > MAX_FRAME_BYTES {
        return Err(format!("frame too large: {} bytes", len));
    }

    let mut payload = vec![0u8; len];
    stream
        .read_exact(&mut payload)
        .map_err(|e| format!("failed to read frame payload: {}", e))?;
    Ok(payload)
}


/// Serialize a message and write it as one frame.
pub fn write_json<W: Write, T: Serialize>(stream: &mut W, value: &T) -> Result<(), String> {
    let json = serde_json::to_vec(value).map_err(|e| format!("failed to serialize: {}", e))?;
    write_frame(stream, &json)
}


/// Read one frame and parse it as the expected message type.
pub fn read_json<R: Read, T: DeserializeOwned>(stream: &mut R) -> Result<T, String> {
    let payload = read_frame(stream)?;
    serde_json::from_slice(&payload).map_err(|e| format!("failed to parse message: {}", e))
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
