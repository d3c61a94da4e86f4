//! TempFile: a working copy of image bytes owned by one pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::ids::UserId;

/// Who allocated a temp file, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ownership {
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

/// Handle on a file allocated through a `TempFileService`.
///
/// Not `Clone`: whoever holds the handle owns the file and must hand it back
/// to the service to release it. Dropping the handle leaves the file on disk.
#[derive(Debug, PartialEq, Eq)]
pub struct TempFile {
    path: PathBuf,
    mime_type: String,
    ownership: Ownership,
}

impl TempFile {
    pub fn new(path: PathBuf, mime_type: impl Into<String>, ownership: Ownership) -> Self {
        Self {
            path,
            mime_type: mime_type.into(),
            ownership,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// MIME type the file was declared with when allocated.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn ownership(&self) -> &Ownership {
        &self.ownership
    }
}
