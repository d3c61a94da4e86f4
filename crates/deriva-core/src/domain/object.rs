//! Repository object: a pid plus its keyed datastream collection.

use std::collections::BTreeMap;

use super::datastream::Datastream;
use super::ids::{DatastreamId, Pid};

/// An object as held by a store.
///
/// Datastreams are reached through `get`/`has`/`insert` on the keyed
/// collection; nothing indexes the object directly.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryObject {
    pub pid: Pid,
    pub label: String,
    datastreams: BTreeMap<DatastreamId, Datastream>,
}

impl RepositoryObject {
    pub fn new(pid: Pid, label: impl Into<String>) -> Self {
        Self {
            pid,
            label: label.into(),
            datastreams: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: &DatastreamId) -> Option<&Datastream> {
        self.datastreams.get(id)
    }

    pub fn has(&self, id: &DatastreamId) -> bool {
        self.datastreams.contains_key(id)
    }

    /// Insert or replace the datastream stored under its own id.
    pub fn insert(&mut self, datastream: Datastream) -> Option<Datastream> {
        self.datastreams.insert(datastream.id.clone(), datastream)
    }

    pub fn datastream_ids(&self) -> impl Iterator<Item = &DatastreamId> {
        self.datastreams.keys()
    }
}
