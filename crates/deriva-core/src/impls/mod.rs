//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryObjectStore**: テスト・組み込み用のストア
//! - **DirectoryObjectStore**: ローカルディレクトリに datastream を保存（CLI 用）
//! - **LocalTempFiles**: ディレクトリ配下の一時ファイル
//! - **ImageRsCodec**: `image` クレートによるデコード・リサイズ
//! - **TableMimeRegistry**: MIME type と拡張子の対応表
//! - **MapConfig**: 設定値
//! - **StaticUser**: 固定ユーザー

pub mod inmem_store;
pub mod dir_store;
pub mod local_temp;
pub mod image_rs;
pub mod mime_table;
pub mod config;
pub mod static_user;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryObjectStore;
pub use self::dir_store::DirectoryObjectStore;
pub use self::local_temp::LocalTempFiles;
pub use self::image_rs::ImageRsCodec;
pub use self::mime_table::TableMimeRegistry;
pub use self::config::MapConfig;
pub use self::static_user::StaticUser;
