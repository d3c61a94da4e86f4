//! SourceExtractor: copy `OBJ` out of the store into a temp file.

use tracing::debug;

use crate::domain::{DatastreamId, Ownership, Pid, TempFile};
use crate::ports::{
    Clock, CurrentUser, MimeRegistry, ObjectStore, StoreError, TempFileError, TempFileService,
};

/// The working copy of `OBJ`, plus the names later steps derive from it.
#[derive(Debug)]
pub struct ExtractedSource {
    pub temp_file: TempFile,
    /// Extension resolved from the `OBJ` MIME type, without the dot.
    pub extension: String,
    /// File-name safe form of the pid.
    pub base_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("object {0} has no OBJ datastream")]
    NoSource(Pid),

    #[error("failed to read the OBJ datastream of {pid}")]
    Store {
        pid: Pid,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    TempFile(#[from] TempFileError),
}

pub struct SourceExtractor<'a> {
    pub store: &'a dyn ObjectStore,
    pub mime: &'a dyn MimeRegistry,
    pub temp_files: &'a dyn TempFileService,
    pub user: &'a dyn CurrentUser,
    pub clock: &'a dyn Clock,
}

impl SourceExtractor<'_> {
    /// Allocates one temp file (`{base}OBJ.{ext}`) the caller must release.
    pub fn extract(&self, pid: &Pid) -> Result<ExtractedSource, ExtractError> {
        let source = match self.store.get_datastream(pid, &DatastreamId::OBJ) {
            Ok(Some(ds)) => ds,
            Ok(None) | Err(StoreError::ObjectNotFound(_)) => {
                return Err(ExtractError::NoSource(pid.clone()));
            }
            Err(source) => {
                return Err(ExtractError::Store {
                    pid: pid.clone(),
                    source,
                });
            }
        };

        let extension = self.mime.extension_for(&source.mime_type);
        let base_name = pid.file_base();
        let ownership = Ownership {
            user: self.user.id(),
            created_at: self.clock.now(),
        };
        let temp_file = self.temp_files.create(
            &format!("{base_name}OBJ.{extension}"),
            &source.mime_type,
            ownership,
            &source.content,
        )?;
        debug!(
            pid = %pid,
            path = %temp_file.path().display(),
            mime_type = %source.mime_type,
            "OBJ extracted"
        );

        Ok(ExtractedSource {
            temp_file,
            extension,
            base_name,
        })
    }
}
