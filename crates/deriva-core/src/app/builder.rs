//! GeneratorBuilder - DerivativeGenerator の構築とワイヤリング
//!
//! # 設計原則
//! - 必須の port（store / temp_files / codec / user）が無ければ build() で失敗
//! - mime / config / clock は既定の実装を使う

use std::sync::Arc;

use crate::impls::{MapConfig, TableMimeRegistry};
use crate::ports::{
    Clock, ConfigSource, CurrentUser, ImageCodec, MimeRegistry, ObjectStore, SystemClock,
    TempFileService,
};

use super::generator::DerivativeGenerator;

/// GeneratorBuilder は DerivativeGenerator を構築
///
/// # 使用例
/// ```ignore
/// let generator = GeneratorBuilder::new()
///     .store(Arc::new(InMemoryObjectStore::new()))
///     .temp_files(Arc::new(LocalTempFiles::in_system_temp()))
///     .codec(Arc::new(ImageRsCodec::new()))
///     .user(Arc::new(StaticUser::new("admin")))
///     .build()?;
/// ```
pub struct GeneratorBuilder {
    store: Option<Arc<dyn ObjectStore>>,
    temp_files: Option<Arc<dyn TempFileService>>,
    codec: Option<Arc<dyn ImageCodec>>,
    user: Option<Arc<dyn CurrentUser>>,
    mime: Arc<dyn MimeRegistry>,
    config: Arc<dyn ConfigSource>,
    clock: Arc<dyn Clock>,
}

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing collaborators: {0:?}. These ports must be set before build().")]
    MissingCollaborators(Vec<&'static str>),
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            temp_files: None,
            codec: None,
            user: None,
            mime: Arc::new(TableMimeRegistry::new()),
            config: Arc::new(MapConfig::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn temp_files(mut self, temp_files: Arc<dyn TempFileService>) -> Self {
        self.temp_files = Some(temp_files);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn user(mut self, user: Arc<dyn CurrentUser>) -> Self {
        self.user = Some(user);
        self
    }

    pub fn mime(mut self, mime: Arc<dyn MimeRegistry>) -> Self {
        self.mime = mime;
        self
    }

    pub fn config(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// # 検証
    /// - 必須 port が全て設定されているかチェック
    /// - 不足があれば BuildError::MissingCollaborators（不足分を全て列挙）
    pub fn build(self) -> Result<DerivativeGenerator, BuildError> {
        match (self.store, self.temp_files, self.codec, self.user) {
            (Some(store), Some(temp_files), Some(codec), Some(user)) => Ok(DerivativeGenerator {
                store,
                temp_files,
                codec,
                mime: self.mime,
                config: self.config,
                user,
                clock: self.clock,
            }),
            (store, temp_files, codec, user) => {
                let missing = [
                    ("store", store.is_none()),
                    ("temp_files", temp_files.is_none()),
                    ("codec", codec.is_none()),
                    ("user", user.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(BuildError::MissingCollaborators(missing))
            }
        }
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
