//! Remote worker — runs blocking service calls off the UI loop.
//!
//! Handlers never wait on the network. They submit a [`RemoteJob`] through
//! a [`RemoteHandle`] and return; a single worker thread performs the call
//! and pushes a [`CallOutcome`] onto the outcome channel, which the
//! frontend drains on its tick. Jobs complete in submission order because
//! there is one worker, but nothing downstream may rely on that — the
//! contract is only "an outcome eventually arrives per job".

use std::sync::mpsc;
use std::thread;

use crate::remote::{ApiRequest, ApiResponse, Remote};


/// How a completed call's response should be rendered into the output log.
/// Carried alongside the request so the outcome can be formatted without
/// re-deriving which command issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    TagsAdded,
    TagsListed,
    LinkAdded,
    LinksListed,
    LaterSaved,
    LatersListed,
    NoteAdded,
    NotesListed,
    NoteFlagged,
}


/// A unit of remote work submitted by a command handler.
#[derive(Debug)]
pub struct RemoteJob {
    pub kind: RenderKind,
    pub request: ApiRequest,
}


/// A finished call, ready for rendering.
#[derive(Debug)]
pub struct CallOutcome {
    pub kind: RenderKind,
    pub result: Result<ApiResponse, String>,
}


/// Cloneable submission side of the job channel.
#[derive(Clone)]
pub struct RemoteHandle {
    sender: mpsc::Sender<RemoteJob>,
}


impl RemoteHandle {
    /// Submit a job. Fails only when the worker is gone, which the caller
    /// reports as an ordinary error line.
    pub fn submit(&self, job: RemoteJob) -> Result<(), String> {
        self.sender
            .send(job)
            .map_err(|_| "remote worker is not running".to_string())
    }

    /// A handle wired to a bare channel instead of a worker — tests use
    /// the returned receiver to observe exactly what handlers submit.
    pub fn detached() -> (RemoteHandle, mpsc::Receiver<RemoteJob>) {
        let (sender, receiver) = mpsc::channel();
        (RemoteHandle { sender }, receiver)
    }
}


/// Owns the worker thread. Dropping every [`RemoteHandle`] ends the
/// thread's job loop; `join` then reaps it.
pub struct RemoteWorker {
    thread: Option<thread::JoinHandle<()>>,
}


impl RemoteWorker {
    /// Spawn a worker around a [`Remote`] implementation. Returns the
    /// submission handle, the outcome receiver, and the worker itself.
    pub fn spawn(remote: Box<dyn Remote>) -> (RemoteHandle, mpsc::Receiver<CallOutcome>, RemoteWorker) {
        let (job_tx, job_rx) = mpsc::channel();
        let (out_tx, out_rx) = mpsc::channel();
        let thread = thread::spawn(move || serve(remote, job_rx, out_tx));
        (
            RemoteHandle { sender: job_tx },
            out_rx,
            RemoteWorker {
                thread: Some(thread),
            },
        )
    }

    /// Wait for the worker to finish. Call after all handles are dropped.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}


/// The worker loop: one call per job until the job channel closes or the
/// outcome side stops listening.
fn serve(remote: Box<dyn Remote>, jobs: mpsc::Receiver<RemoteJob>, outcomes: mpsc::Sender<CallOutcome>) {
    for job in jobs {
        let result = remote.call(&job.request);
        let outcome = CallOutcome {
            kind: job.kind,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
