//! Recording test-double for the [`Remote`] trait.
//!
//! Records every request and serves canned results in FIFO order; once the
//! queue is empty it answers with an empty success. Interior mutability is
//! required because the worker calls through `&self` from its own thread.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::remote::{ApiRequest, ApiResponse, Remote};


#[derive(Default)]
pub struct MockRemote {
    calls: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<ApiResponse, String>>>,
}


impl MockRemote {
    pub fn new() -> Self {
        MockRemote::default()
    }

    /// Queue the result for the next unanswered call.
    pub fn push_response(&self, result: Result<ApiResponse, String>) {
        self.responses.lock().unwrap().push_back(result);
    }

    /// All requests seen so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}


impl Remote for MockRemote {
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse, String> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::success(vec![])))
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
