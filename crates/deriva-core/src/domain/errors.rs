//! Errors - ドメインエラー
//!
//! 各 port は自分のエラー型（StoreError, TempFileError, CodecError）を持ちます。
//! DerivaError は書き込み段階（ストア + 一時ファイル）を `?` でまとめる集約型です。
//! CodecError は ImageScaler で止まるのでここには含めません。
//! パイプラインの入口（DerivativeGenerator）は Err を返さず、
//! OutcomeRecord に変換します。

use std::error::Error;

use crate::ports::{StoreError, TempFileError};

#[derive(Debug, thiserror::Error)]
pub enum DerivaError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    TempFile(#[from] TempFileError),
}

/// Render an error and every `source()` below it as `outer: inner: ...`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}
