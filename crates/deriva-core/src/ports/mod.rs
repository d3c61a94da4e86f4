//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! パイプラインが触れる外部システム（オブジェクトストア、一時ファイル、
//! 画像処理、設定、現在のユーザー、時計）はすべてここの trait を経由します。
//!
//! # 設計原則
//! - グローバルな状態を参照しない（コンストラクタで注入する）
//! - すべて `Send + Sync`（CLI から複数スレッドで共有できる）
//! - ログは port にせず `tracing` を直接使う

pub mod object_store;
pub mod temp_files;
pub mod image_codec;
pub mod mime_registry;
pub mod config;
pub mod current_user;
pub mod clock;

// 主要な trait を再エクスポート
pub use self::object_store::{ObjectStore, StoreError};
pub use self::temp_files::{TempFileError, TempFileService};
pub use self::image_codec::{CodecError, ImageCodec, ScalableImage};
pub use self::mime_registry::{MimeRegistry, FALLBACK_EXTENSION};
pub use self::config::ConfigSource;
pub use self::current_user::CurrentUser;
pub use self::clock::{Clock, FixedClock, SystemClock};
