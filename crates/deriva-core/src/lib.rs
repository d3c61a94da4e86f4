//! deriva-core
//!
//! Derivative image generation for repository objects: a scaled thumbnail
//! (`TN`) and a medium-size rendition (`MEDIUM_SIZE`) produced from the
//! original `OBJ` datastream.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, datastream, temp_file, outcome, derivative, errors）
//! - **ports**: 抽象化レイヤー（ObjectStore, TempFileService, ImageCodec, MimeRegistry, など）
//! - **impls**: ports の実装（InMemoryObjectStore, DirectoryObjectStore, ImageRsCodec, など）
//! - **app**: パイプライン（decision → extractor → scaler → writer → outcome）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;

pub use app::{DerivativeGenerator, GeneratorBuilder};
pub use domain::{DerivativeKind, OutcomeKind, OutcomeRecord, Pid};
