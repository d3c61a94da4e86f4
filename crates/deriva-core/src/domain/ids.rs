//! Domain identifiers (strongly-typed IDs).
//!
//! - **Pid**: `namespace:local` 形式の永続識別子
//! - **DatastreamId**: `OBJ`, `TN`, `MEDIUM_SIZE` などの datastream 名
//! - **UserId**: temp file の所有者として記録するユーザー
//!
//! String をそのまま使わず newtype にすることで、Pid と DatastreamId を
//! 取り違えるとコンパイルエラーになります。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Maximum length of a datastream identifier.
const MAX_DSID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("invalid pid '{0}': expected namespace:local")]
    InvalidPid(String),

    #[error("invalid datastream id '{0}'")]
    InvalidDatastreamId(String),
}

/// Persistent identifier of a repository object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pid(String);

impl Pid {
    pub fn parse(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        let valid = match value.split_once(':') {
            Some((namespace, local)) => !namespace.is_empty() && !local.is_empty(),
            None => false,
        } && !value.chars().any(|c| c.is_whitespace() || c == '/');
        if valid {
            Ok(Self(value))
        } else {
            Err(IdError::InvalidPid(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-name safe form of the pid (`demo:1` → `demo_1`).
    pub fn file_base(&self) -> String {
        self.0.replace(':', "_")
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Pid {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Pid> for String {
    fn from(pid: Pid) -> Self {
        pid.0
    }
}

impl std::str::FromStr for Pid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Name of a datastream slot on an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatastreamId(Cow<'static, str>);

impl DatastreamId {
    /// The original upload.
    pub const OBJ: DatastreamId = DatastreamId(Cow::Borrowed("OBJ"));
    /// Thumbnail rendition.
    pub const TN: DatastreamId = DatastreamId(Cow::Borrowed("TN"));
    /// Medium-size rendition.
    pub const MEDIUM_SIZE: DatastreamId = DatastreamId(Cow::Borrowed("MEDIUM_SIZE"));

    /// A datastream id starts with a letter and continues with letters,
    /// digits, `_`, `-` or `.`.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        let mut chars = value.chars();
        let valid = value.len() <= MAX_DSID_LEN
            && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(Self(Cow::Owned(value)))
        } else {
            Err(IdError::InvalidDatastreamId(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatastreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DatastreamId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DatastreamId> for String {
    fn from(id: DatastreamId) -> Self {
        id.0.into_owned()
    }
}

/// Identity of the user a pipeline run acts for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
