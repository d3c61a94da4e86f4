//! Shared fixtures for the app-layer tests.

use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use image::{GenericImageView, ImageOutputFormat, Rgb, RgbImage};
use tempfile::TempDir;

use crate::domain::{
    ControlGroup, Datastream, DatastreamId, Ownership, Pid, RepositoryObject, TempFile,
};
use crate::impls::{
    ImageRsCodec, InMemoryObjectStore, LocalTempFiles, MapConfig, StaticUser, TableMimeRegistry,
};
use crate::ports::{
    Clock, FixedClock, ObjectStore, StoreError, TempFileError, TempFileService,
};

use super::builder::GeneratorBuilder;
use super::extractor::SourceExtractor;
use super::generator::DerivativeGenerator;
use super::writer::DatastreamWriter;

/// PNG-encoded gradient of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn decoded_size(bytes: &[u8]) -> (u32, u32) {
    image::load_from_memory(bytes).unwrap().dimensions()
}

/// One object `demo:1` in memory, temp files in a private directory.
pub struct Fixture {
    pub pid: Pid,
    pub store: Arc<InMemoryObjectStore>,
    pub temp_files: LocalTempFiles,
    pub codec: ImageRsCodec,
    pub mime: TableMimeRegistry,
    pub user: StaticUser,
    pub clock: FixedClock,
    _dir: TempDir,
}

impl Fixture {
    pub fn with_obj(mime_type: &str, content: Vec<u8>) -> Self {
        let obj = Datastream::new(DatastreamId::OBJ, ControlGroup::Managed)
            .with_content(mime_type, content);
        Self::build(Some(obj))
    }

    pub fn without_obj() -> Self {
        Self::build(None)
    }

    fn build(obj: Option<Datastream>) -> Self {
        let pid = Pid::parse("demo:1").unwrap();
        let mut object = RepositoryObject::new(pid.clone(), "Demo object");
        if let Some(obj) = obj {
            object.insert(obj);
        }
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert_object(object).unwrap();

        let dir = tempfile::tempdir().unwrap();
        // Created lazily by LocalTempFiles, so an untouched fixture has no temp dir.
        let temp_files = LocalTempFiles::new(dir.path().join("tmp"));

        Self {
            pid,
            store,
            temp_files,
            codec: ImageRsCodec::new(),
            mime: TableMimeRegistry::new(),
            user: StaticUser::new("admin"),
            clock: FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            _dir: dir,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn extractor(&self) -> SourceExtractor<'_> {
        SourceExtractor {
            store: &*self.store,
            mime: &self.mime,
            temp_files: &self.temp_files,
            user: &self.user,
            clock: &self.clock,
        }
    }

    pub fn writer(&self) -> DatastreamWriter<'_> {
        DatastreamWriter {
            store: &*self.store,
            temp_files: &self.temp_files,
        }
    }

    /// Builder wired to this fixture; any port can still be replaced.
    pub fn builder(&self, config: MapConfig) -> GeneratorBuilder {
        GeneratorBuilder::new()
            .store(self.store.clone())
            .temp_files(Arc::new(self.temp_files.clone()))
            .codec(Arc::new(self.codec))
            .mime(Arc::new(self.mime))
            .user(Arc::new(self.user.clone()))
            .clock(Arc::new(self.clock))
            .config(Arc::new(config))
    }

    pub fn generator(&self, config: MapConfig) -> DerivativeGenerator {
        self.builder(config).build().unwrap()
    }

    pub fn datastream(&self, dsid: &DatastreamId) -> Option<Datastream> {
        self.store.get_datastream(&self.pid, dsid).unwrap()
    }

    pub fn temp_file_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.temp_files.dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn temp_file_count(&self) -> usize {
        self.temp_file_names().len()
    }
}

/// Reads pass through; every write fails as a full disk would.
pub struct FailingWrites {
    inner: Arc<InMemoryObjectStore>,
}

impl FailingWrites {
    pub fn new(inner: Arc<InMemoryObjectStore>) -> Self {
        Self { inner }
    }

    fn quota() -> StoreError {
        StoreError::Backend("disk quota exceeded".to_string())
    }
}

impl ObjectStore for FailingWrites {
    fn get_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
    ) -> Result<Option<Datastream>, StoreError> {
        self.inner.get_datastream(pid, id)
    }

    fn has_datastream(&self, pid: &Pid, id: &DatastreamId) -> bool {
        self.inner.has_datastream(pid, id)
    }

    fn create_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
        control_group: ControlGroup,
    ) -> Result<Datastream, StoreError> {
        self.inner.create_datastream(pid, id, control_group)
    }

    fn ingest(&self, _pid: &Pid, _datastream: Datastream) -> Result<(), StoreError> {
        Err(Self::quota())
    }

    fn update_datastream(&self, _pid: &Pid, _datastream: &Datastream) -> Result<(), StoreError> {
        Err(Self::quota())
    }
}

/// Lookups work, but reading any datastream fails with an I/O error.
pub struct FailingReads {
    inner: Arc<InMemoryObjectStore>,
}

impl FailingReads {
    pub fn new(inner: Arc<InMemoryObjectStore>) -> Self {
        Self { inner }
    }
}

impl ObjectStore for FailingReads {
    fn get_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
    ) -> Result<Option<Datastream>, StoreError> {
        Err(StoreError::Io {
            path: format!("/repo/{pid}/{id}.bin").into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        })
    }

    fn has_datastream(&self, pid: &Pid, id: &DatastreamId) -> bool {
        self.inner.has_datastream(pid, id)
    }

    fn create_datastream(
        &self,
        pid: &Pid,
        id: &DatastreamId,
        control_group: ControlGroup,
    ) -> Result<Datastream, StoreError> {
        self.inner.create_datastream(pid, id, control_group)
    }

    fn ingest(&self, pid: &Pid, datastream: Datastream) -> Result<(), StoreError> {
        self.inner.ingest(pid, datastream)
    }

    fn update_datastream(&self, pid: &Pid, datastream: &Datastream) -> Result<(), StoreError> {
        self.inner.update_datastream(pid, datastream)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempFault {
    Create,
    Copy,
}

/// `LocalTempFiles` with one operation failing as a read-only volume would.
pub struct FaultyTempFiles {
    inner: LocalTempFiles,
    fault: TempFault,
}

impl FaultyTempFiles {
    pub fn new(inner: LocalTempFiles, fault: TempFault) -> Self {
        Self { inner, fault }
    }
}

impl TempFileService for FaultyTempFiles {
    fn create(
        &self,
        name: &str,
        mime_type: &str,
        ownership: Ownership,
        content: &[u8],
    ) -> Result<TempFile, TempFileError> {
        if self.fault == TempFault::Create {
            return Err(TempFileError::Write {
                path: self.inner.dir().join(name),
                source: read_only(),
            });
        }
        self.inner.create(name, mime_type, ownership, content)
    }

    fn copy(&self, file: &TempFile, new_name: &str) -> Result<TempFile, TempFileError> {
        if self.fault == TempFault::Copy {
            return Err(TempFileError::Copy {
                path: self.inner.dir().join(new_name),
                source: read_only(),
            });
        }
        self.inner.copy(file, new_name)
    }

    fn read(&self, file: &TempFile) -> Result<Vec<u8>, TempFileError> {
        self.inner.read(file)
    }

    fn delete(&self, file: TempFile) -> Result<(), TempFileError> {
        self.inner.delete(file)
    }
}

fn read_only() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume")
}
