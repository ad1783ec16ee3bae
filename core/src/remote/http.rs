//! Blocking HTTP implementation of the [`Remote`] trait.

use std::time::Duration;

use crate::remote::{ApiRequest, ApiResponse, Remote};


/// Talks to the annotation service with form-encoded POSTs.
///
/// The timeout is the only client-side limit; the console core enforces
/// none of its own.
pub struct HttpRemote {
    client: reqwest::blocking::Client,
    endpoint: String,
}


impl HttpRemote {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| format!("cannot build HTTP client: {}", e))?;
        Ok(HttpRemote {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}


impl Remote for HttpRemote {
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&request.form_fields())
            .send()
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response
            .json::<ApiResponse>()
            .map_err(|e| format!("invalid response: {}", e))
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
