//! CurrentUser port - 実行ユーザー
//!
//! 一時ファイルの所有者として記録されます。

use crate::domain::UserId;

pub trait CurrentUser: Send + Sync {
    fn id(&self) -> UserId;
}
