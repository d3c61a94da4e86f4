//! TempFileService port - 作業用の一時ファイル
//!
//! # 所有権
//! - `create` / `copy` が返す `TempFile` は呼び出し側が所有する
//! - 解放は `delete(file)` のみ（値で受け取るので二重削除できない）
//! - Drop では削除しない

use std::path::PathBuf;

use crate::domain::{Ownership, TempFile};

#[derive(Debug, thiserror::Error)]
pub enum TempFileError {
    #[error("invalid temp file name '{0}'")]
    InvalidName(String),

    #[error("failed to write temp file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read temp file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy temp file to {}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete temp file {}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait TempFileService: Send + Sync {
    /// Allocate `name` and fill it with `content`.
    fn create(
        &self,
        name: &str,
        mime_type: &str,
        ownership: Ownership,
        content: &[u8],
    ) -> Result<TempFile, TempFileError>;

    /// Copy `file` to a new temp file called `new_name`, keeping its metadata.
    fn copy(&self, file: &TempFile, new_name: &str) -> Result<TempFile, TempFileError>;

    fn read(&self, file: &TempFile) -> Result<Vec<u8>, TempFileError>;

    fn delete(&self, file: TempFile) -> Result<(), TempFileError>;
}
