//! DirectoryObjectStore - ローカルディレクトリ上のオブジェクトストア
//!
//! # レイアウト
//! ```text
//! <root>/<pid>/object.json      { "pid": ..., "label": ... }
//! <root>/<pid>/<DSID>.ds.json   datastream のメタデータ
//! <root>/<pid>/<DSID>.bin       datastream の内容
//! ```
//! `<pid>` は `%` を `%25`、`:` を `%3A` に置き換えたもの（可逆）。
//! `object.json` の pid と開こうとした pid が違えばエラーにします。
//! メタデータファイルの有無が datastream の有無を決めるので、内容を先に
//! 書いてからメタデータを書きます。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{ControlGroup, Datastream, DatastreamId, Pid, RepositoryObject};
use crate::ports::{ObjectStore, StoreError};

const OBJECT_FILE: &str = "object.json";
const META_SUFFIX: &str = ".ds.json";

#[derive(Debug, Serialize, Deserialize)]
struct ObjectMeta {
    pid: Pid,
    label: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryObjectStore {
    root: PathBuf,
}

impl DirectoryObjectStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn object_exists(&self, pid: &Pid) -> bool {
        self.object_dir(pid).join(OBJECT_FILE).is_file()
    }

    pub fn create_object(&self, pid: &Pid, label: &str) -> Result<(), StoreError> {
        if self.object_exists(pid) {
            return Err(StoreError::ObjectExists(pid.clone()));
        }
        let dir = self.object_dir(pid);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        let meta = ObjectMeta {
            pid: pid.clone(),
            label: label.to_string(),
        };
        write_json(&dir.join(OBJECT_FILE), &meta)
    }

    /// Load an object with every datastream it holds.
    pub fn load_object(&self, pid: &Pid) -> Result<RepositoryObject, StoreError> {
        let (dir, meta) = self.open_object(pid)?;
        let mut object = RepositoryObject::new(meta.pid, meta.label);

        let entries = fs::read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            let Some(Ok(dsid)) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(META_SUFFIX))
                .map(DatastreamId::parse)
            else {
                continue;
            };
            if let Some(ds) = self.get_datastream(pid, &dsid)? {
                object.insert(ds);
            }
        }
        Ok(object)
    }

    /// Insert or replace a datastream regardless of its current state.
    pub fn put_datastream(&self, pid: &Pid, datastream: &Datastream) -> Result<(), StoreError> {
        let dir = self.existing_object_dir(pid)?;
        self.write_datastream(&dir, datastream)
    }

    fn object_dir(&self, pid: &Pid) -> PathBuf {
        self.root.join(encode_pid(pid))
    }

    fn existing_object_dir(&self, pid: &Pid) -> Result<PathBuf, StoreError> {
        self.open_object(pid).map(|(dir, _)| dir)
    }

    /// The object's directory and metadata, once the stored pid matches.
    fn open_object(&self, pid: &Pid) -> Result<(PathBuf, ObjectMeta), StoreError> {
        if !self.object_exists(pid) {
            return Err(StoreError::ObjectNotFound(pid.clone()));
        }
        let dir = self.object_dir(pid);
        let meta_path = dir.join(OBJECT_FILE);
        let meta: ObjectMeta = read_json(&meta_path)?;
        if meta.pid != *pid {
            return Err(StoreError::PidMismatch {
                path: meta_path,
                expected: pid.clone(),
                found: meta.pid,
            });
        }
        Ok((dir, meta))
    }

    fn write_datastream(&self, dir: &Path, datastream: &Datastream) -> Result<(), StoreError> {
        let (meta_path, content_path) = datastream_paths(dir, &datastream.id);
        fs::write(&content_path, &datastream.content).map_err(|source| StoreError::Io {
            path: content_path,
            source,
        })?;
        write_json(&meta_path, datastream)
    }
}

impl ObjectStore for DirectoryObjectStore {
    fn get_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
    ) -> Result<Option<Datastream>, StoreError> {
        let dir = self.existing_object_dir(pid)?;
        let (meta_path, content_path) = datastream_paths(&dir, id);
        if !meta_path.is_file() {
            return Ok(None);
        }
        let mut datastream: Datastream = read_json(&meta_path)?;
        datastream.content = match fs::read(&content_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: content_path,
                    source,
                });
            }
        };
        Ok(Some(datastream))
    }

    fn has_datastream(&self, pid: &Pid, id: &DatastreamId) -> bool {
        self.existing_object_dir(pid)
            .is_ok_and(|dir| datastream_paths(&dir, id).0.is_file())
    }

    fn create_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
        control_group: ControlGroup,
    ) -> Result<Datastream, StoreError> {
        self.existing_object_dir(pid)?;
        Ok(Datastream::new(id.clone(), control_group))
    }

    fn ingest(&self, pid: &Pid, datastream: Datastream) -> Result<(), StoreError> {
        let dir = self.existing_object_dir(pid)?;
        if self.has_datastream(pid, &datastream.id) {
            return Err(StoreError::DatastreamExists {
                pid: pid.clone(),
                dsid: datastream.id,
            });
        }
        self.write_datastream(&dir, &datastream)
    }

    fn update_datastream(&self, pid: &Pid, datastream: &Datastream) -> Result<(), StoreError> {
        let dir = self.existing_object_dir(pid)?;
        if !self.has_datastream(pid, &datastream.id) {
            return Err(StoreError::DatastreamNotFound {
                pid: pid.clone(),
                dsid: datastream.id.clone(),
            });
        }
        self.write_datastream(&dir, datastream)
    }
}

fn datastream_paths(dir: &Path, id: &DatastreamId) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{id}{META_SUFFIX}")),
        dir.join(format!("{id}.bin")),
    )
}

/// `%` first, so the mapping stays one-to-one.
fn encode_pid(pid: &Pid) -> String {
    pid.as_str().replace('%', "%25").replace(':', "%3A")
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}
