//! Datastream model: a named binary content slot on a repository object.

use serde::{Deserialize, Serialize};

use super::ids::DatastreamId;

/// MIME type given to a datastream before any content is assigned.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Storage mode of a datastream.
///
/// Serialized with the single-letter codes the repository uses (X/M/E/R).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlGroup {
    /// Inline XML, stored in the object record itself.
    #[serde(rename = "X")]
    Inline,

    /// Managed content, stored by the repository.
    #[serde(rename = "M")]
    Managed,

    /// External reference, fetched by the repository on access.
    #[serde(rename = "E")]
    External,

    /// Redirect, handed to clients as a URL.
    #[serde(rename = "R")]
    Redirect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datastream {
    pub id: DatastreamId,
    pub label: String,
    pub mime_type: String,
    pub control_group: ControlGroup,

    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Datastream {
    /// A fresh, empty datastream labelled with its own id.
    pub fn new(id: DatastreamId, control_group: ControlGroup) -> Self {
        Self {
            label: id.to_string(),
            id,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            control_group,
            content: Vec::new(),
        }
    }

    pub fn with_content(mut self, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        self.mime_type = mime_type.into();
        self.content = content;
        self
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}
