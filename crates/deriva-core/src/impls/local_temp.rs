//! LocalTempFiles - ディレクトリ配下の一時ファイル
//!
//! ファイル名は呼び出し側が決めます（pid + サフィックス）。同じ名前を
//! 再度 create すると上書きされます。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{Ownership, TempFile};
use crate::ports::{TempFileError, TempFileService};

#[derive(Debug, Clone)]
pub struct LocalTempFiles {
    dir: PathBuf,
}

impl LocalTempFiles {
    /// Temp files under `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$TMPDIR/deriva`
    pub fn in_system_temp() -> Self {
        Self::new(std::env::temp_dir().join("deriva"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, TempFileError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if !valid {
            return Err(TempFileError::InvalidName(name.to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(|source| TempFileError::Write {
            path: self.dir.clone(),
            source,
        })?;
        Ok(self.dir.join(name))
    }
}

impl TempFileService for LocalTempFiles {
    fn create(
        &self,
        name: &str,
        mime_type: &str,
        ownership: Ownership,
        content: &[u8],
    ) -> Result<TempFile, TempFileError> {
        let path = self.path_for(name)?;
        fs::write(&path, content).map_err(|source| TempFileError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            owner = %ownership.user,
            bytes = content.len(),
            "temp file created"
        );
        Ok(TempFile::new(path, mime_type, ownership))
    }

    fn copy(&self, file: &TempFile, new_name: &str) -> Result<TempFile, TempFileError> {
        let path = self.path_for(new_name)?;
        fs::copy(file.path(), &path).map_err(|source| TempFileError::Copy {
            path: path.clone(),
            source,
        })?;
        Ok(TempFile::new(
            path,
            file.mime_type(),
            file.ownership().clone(),
        ))
    }

    fn read(&self, file: &TempFile) -> Result<Vec<u8>, TempFileError> {
        fs::read(file.path()).map_err(|source| TempFileError::Read {
            path: file.path().to_path_buf(),
            source,
        })
    }

    fn delete(&self, file: TempFile) -> Result<(), TempFileError> {
        fs::remove_file(file.path()).map_err(|source| TempFileError::Delete {
            path: file.path().to_path_buf(),
            source,
        })?;
        debug!(path = %file.path().display(), "temp file deleted");
        Ok(())
    }
}
