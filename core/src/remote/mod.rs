//! Remote annotation service — wire shapes and the client trait.
//!
//! The service speaks form-encoded HTTP POST in, JSON out. Every request
//! carries an `action` from a fixed set plus whichever fields that action
//! needs; every response is `{result: "success"|..., data: [...]}` where
//! the data records are flat maps whose keys depend on the action. The
//! protocol beyond these shapes is the collaborator's business — a failed
//! result or transport error is surfaced to the user as an error line and
//! nothing more.
//!
//! - [`http`] — the blocking HTTP implementation used in production
//! - [`mock`] — a recording test-double
//! - [`worker`] — the thread that runs calls off the UI loop

pub mod http;
pub mod mock;
pub mod worker;

use serde::{Deserialize, Serialize};
use std::fmt;


/// The fixed set of service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTags,
    GetTags,
    AddLink,
    GetLinks,
    AddReadLater,
    GetReadLater,
    AddNote,
    GetNotes,
    FlagNote,
}


impl Action {
    /// The wire name sent in the `action` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::AddTags => "add_tags",
            Action::GetTags => "get_tags",
            Action::AddLink => "add_link",
            Action::GetLinks => "get_links",
            Action::AddReadLater => "add_read_later",
            Action::GetReadLater => "get_read_later",
            Action::AddNote => "add_note",
            Action::GetNotes => "get_notes",
            Action::FlagNote => "flag_note",
        }
    }
}


impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// One service request. Only the fields relevant to the action are set;
/// absent fields are omitted from the form entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub action: Action,
    pub url: Option<String>,
    pub installation_id: Option<String>,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub note: Option<String>,
    pub search: Option<String>,
}


impl ApiRequest {
    pub fn new(action: Action) -> Self {
        ApiRequest {
            action,
            url: None,
            installation_id: None,
            tags: Vec::new(),
            link: None,
            note: None,
            search: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn installation_id(mut self, id: Option<String>) -> Self {
        self.installation_id = id;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Flatten into form key/value pairs. List-valued `tags` become
    /// repeated `tags[]` keys, the way the service expects arrays.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("action".to_string(), self.action.as_str().to_string())];
        if let Some(url) = &self.url {
            fields.push(("url".to_string(), url.clone()));
        }
        if let Some(id) = &self.installation_id {
            fields.push(("installation_id".to_string(), id.clone()));
        }
        for tag in &self.tags {
            fields.push(("tags[]".to_string(), tag.clone()));
        }
        if let Some(link) = &self.link {
            fields.push(("link".to_string(), link.clone()));
        }
        if let Some(note) = &self.note {
            fields.push(("note".to_string(), note.clone()));
        }
        if let Some(search) = &self.search {
            fields.push(("search".to_string(), search.clone()));
        }
        fields
    }
}


/// One record in a response's `data` array. The service returns flat maps
/// whose keys vary by action, so every field is optional and unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_dt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_list: Vec<String>,
}


/// A service response. Anything other than `result == "success"` is a
/// service-side failure to be shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub data: Vec<Record>,
}


impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }

    /// Build a success response — handy in tests.
    pub fn success(data: Vec<Record>) -> Self {
        ApiResponse {
            result: "success".to_string(),
            data,
        }
    }
}


/// The client seam. `call` blocks; it runs on the worker thread, never on
/// the UI loop. Errors are the transport-level status text shown to the
/// user.
pub trait Remote: Send {
    fn call(&self, request: &ApiRequest) -> Result<ApiResponse, String>;
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
