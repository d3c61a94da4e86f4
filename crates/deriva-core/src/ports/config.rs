//! ConfigSource port - 設定値の取得

/// Boolean feature flags read by the pipeline.
///
/// Unknown keys read as `false`.
pub trait ConfigSource: Send + Sync {
    fn get_bool(&self, key: &str) -> bool;
}
