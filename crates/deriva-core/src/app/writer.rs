//! DatastreamWriter: attach a scaled temp file to the object.

use tracing::{debug, error, warn};

use crate::domain::{ControlGroup, DatastreamId, DerivaError, Pid, TempFile, error_chain};
use crate::ports::{ObjectStore, TempFileService};

/// A failed write. The temp file is handed back untouched; releasing it is
/// up to the caller.
#[derive(Debug)]
pub struct WriteFailure {
    pub message: String,
    pub source: TempFile,
}

pub struct DatastreamWriter<'a> {
    pub store: &'a dyn ObjectStore,
    pub temp_files: &'a dyn TempFileService,
}

impl DatastreamWriter<'_> {
    /// Ingest or update `dsid` on `pid` from `source`.
    ///
    /// On success `source` is consumed and deleted.
    pub fn write(
        &self,
        pid: &Pid,
        dsid: &DatastreamId,
        source: TempFile,
    ) -> Result<(), WriteFailure> {
        if let Err(err) = self.store_content(pid, dsid, &source) {
            error!(
                pid = %pid,
                dsid = %dsid,
                path = %source.path().display(),
                error = %error_chain(&err),
                "derivative datastream write failed"
            );
            return Err(WriteFailure {
                message: err.to_string(),
                source,
            });
        }

        let path = source.path().to_path_buf();
        if let Err(e) = self.temp_files.delete(source) {
            warn!(
                path = %path.display(),
                error = %error_chain(&e),
                "could not delete scaled temp file"
            );
        }
        Ok(())
    }

    fn store_content(
        &self,
        pid: &Pid,
        dsid: &DatastreamId,
        source: &TempFile,
    ) -> Result<(), DerivaError> {
        let content = self.temp_files.read(source)?;
        let mime_type = source.mime_type();

        match self.store.get_datastream(pid, dsid)? {
            Some(mut existing) => {
                if existing.mime_type != mime_type {
                    debug!(
                        pid = %pid,
                        dsid = %dsid,
                        from = %existing.mime_type,
                        to = %mime_type,
                        "MIME type changed"
                    );
                    existing.mime_type = mime_type.to_string();
                }
                existing.content = content;
                self.store.update_datastream(pid, &existing)?;
                debug!(pid = %pid, dsid = %dsid, "datastream updated");
            }
            None => {
                // Content and MIME type are set before the datastream is
                // registered on the object.
                let mut created = self.store.create_datastream(pid, dsid, ControlGroup::Managed)?;
                created.label = dsid.to_string();
                created.mime_type = mime_type.to_string();
                created.content = content;
                self.store.ingest(pid, created)?;
                debug!(pid = %pid, dsid = %dsid, "datastream ingested");
            }
        }
        Ok(())
    }
}
