//! ObjectStore port - datastream の正本（source of truth）
//!
//! オブジェクトと datastream の永続化はストア側の責務です。
//! パイプラインは `OBJ` を読み、`TN` / `MEDIUM_SIZE` を書くだけです。
//!
//! # 実装
//! - **InMemoryObjectStore**: テスト・組み込み用
//! - **DirectoryObjectStore**: ローカルディレクトリ（CLI 用）

use std::path::PathBuf;

use crate::domain::{ControlGroup, Datastream, DatastreamId, Pid};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {0} not found")]
    ObjectNotFound(Pid),

    #[error("object {0} already exists")]
    ObjectExists(Pid),

    #[error("datastream {dsid} already exists on {pid}")]
    DatastreamExists { pid: Pid, dsid: DatastreamId },

    #[error("datastream {dsid} not found on {pid}")]
    DatastreamNotFound { pid: Pid, dsid: DatastreamId },

    #[error("store I/O failed at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid datastream metadata at {}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} holds object {found}, not {expected}", .path.display())]
    PidMismatch {
        path: PathBuf,
        expected: Pid,
        found: Pid,
    },

    #[error("store backend error: {0}")]
    Backend(String),
}

/// ObjectStore はオブジェクトごとの keyed datastream collection を提供
///
/// # 書き込みの順序
/// - 新規: `create_datastream` で下書きを作り、内容と MIME を設定してから `ingest`
/// - 既存: `get_datastream` で取得し、変更して `update_datastream`
///
/// `create_datastream` が返す下書きはまだオブジェクトに登録されていません。
pub trait ObjectStore: Send + Sync {
    fn get_datastream(&self, pid: &Pid, id: &DatastreamId)
    -> Result<Option<Datastream>, StoreError>;

    /// Lookup failures count as absent.
    fn has_datastream(&self, pid: &Pid, id: &DatastreamId) -> bool;

    fn create_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
        control_group: ControlGroup,
    ) -> Result<Datastream, StoreError>;

    /// Register a populated draft on the object for the first time.
    fn ingest(&self, pid: &Pid, datastream: Datastream) -> Result<(), StoreError>;

    /// Persist changes to a datastream that is already registered.
    fn update_datastream(&self, pid: &Pid, datastream: &Datastream) -> Result<(), StoreError>;
}
