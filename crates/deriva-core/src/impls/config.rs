//! MapConfig - キーと値を直接渡す ConfigSource
//!
//! 環境変数やコマンドライン引数の解釈は呼び出し側（CLI は clap）で行い、
//! 結果だけをここに詰めます。

use std::collections::HashMap;

use crate::ports::ConfigSource;

#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, bool>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: bool) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl ConfigSource for MapConfig {
    fn get_bool(&self, key: &str) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }
}
