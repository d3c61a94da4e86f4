//! InMemoryObjectStore - テスト・組み込み用のオブジェクトストア
//!
//! # 実装詳細
//! - HashMap<Pid, RepositoryObject> を Mutex で保護
//! - lock が poison された場合は StoreError::Backend を返す

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{ControlGroup, Datastream, DatastreamId, Pid, RepositoryObject};
use crate::ports::{ObjectStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<Pid, RepositoryObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_object(&self, object: RepositoryObject) -> Result<(), StoreError> {
        let mut objects = self.lock()?;
        if objects.contains_key(&object.pid) {
            return Err(StoreError::ObjectExists(object.pid));
        }
        objects.insert(object.pid.clone(), object);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Pid, RepositoryObject>>, StoreError> {
        self.objects
            .lock()
            .map_err(|_| StoreError::Backend("object map lock poisoned".to_string()))
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
    ) -> Result<Option<Datastream>, StoreError> {
        let objects = self.lock()?;
        let object = objects
            .get(pid)
            .ok_or_else(|| StoreError::ObjectNotFound(pid.clone()))?;
        Ok(object.get(id).cloned())
    }

    fn has_datastream(&self, pid: &Pid, id: &DatastreamId) -> bool {
        self.lock()
            .map(|objects| objects.get(pid).is_some_and(|o| o.has(id)))
            .unwrap_or(false)
    }

    fn create_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
        control_group: ControlGroup,
    ) -> Result<Datastream, StoreError> {
        let objects = self.lock()?;
        if !objects.contains_key(pid) {
            return Err(StoreError::ObjectNotFound(pid.clone()));
        }
        Ok(Datastream::new(id.clone(), control_group))
    }

    fn ingest(&self, pid: &Pid, datastream: Datastream) -> Result<(), StoreError> {
        let mut objects = self.lock()?;
        let object = objects
            .get_mut(pid)
            .ok_or_else(|| StoreError::ObjectNotFound(pid.clone()))?;
        if object.has(&datastream.id) {
            return Err(StoreError::DatastreamExists {
                pid: pid.clone(),
                dsid: datastream.id,
            });
        }
        object.insert(datastream);
        Ok(())
    }

    fn update_datastream(&self, pid: &Pid, datastream: &Datastream) -> Result<(), StoreError> {
        let mut objects = self.lock()?;
        let object = objects
            .get_mut(pid)
            .ok_or_else(|| StoreError::ObjectNotFound(pid.clone()))?;
        if !object.has(&datastream.id) {
            return Err(StoreError::DatastreamNotFound {
                pid: pid.clone(),
                dsid: datastream.id.clone(),
            });
        }
        object.insert(datastream.clone());
        Ok(())
    }
}
