//! App - アプリケーション層
//!
//! ports を組み合わせて派生画像の生成パイプラインを実装します。
//!
//! # 主要コンポーネント
//! - **decision**: 生成が必要かどうか（既存 + force）
//! - **SourceExtractor**: `OBJ` を一時ファイルに取り出す
//! - **ImageScaler**: 一時ファイルを縮小（拡大）して書き戻す
//! - **DatastreamWriter**: 派生 datastream を ingest / update する
//! - **DerivativeGenerator**: 上記を 1→2→3→4 の順に実行し OutcomeRecord を返す
//! - **GeneratorBuilder**: 依存の組み立て（Fail-fast）

pub mod decision;
pub mod extractor;
pub mod scaler;
pub mod writer;
pub mod generator;
pub mod builder;

#[cfg(test)]
pub(crate) mod test_support;

// 主要な型を再エクスポート
pub use self::decision::should_generate;
pub use self::extractor::{ExtractError, ExtractedSource, SourceExtractor};
pub use self::scaler::ImageScaler;
pub use self::writer::{DatastreamWriter, WriteFailure};
pub use self::generator::DerivativeGenerator;
pub use self::builder::{BuildError, GeneratorBuilder};
