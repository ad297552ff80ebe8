//! Snapshot labels
//!
//! A label names one snapshot in a chain (typically a step number such as
//! `"06"`) and becomes part of the snapshot's file name, so it is restricted
//! to characters that are safe in a path component on every platform.

use crate::errors::{FixchainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted label
pub const MAX_LABEL_LEN: usize = 64;

/// Validated snapshot label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnapshotLabel(String);

impl SnapshotLabel {
    /// Validate and wrap a label
    ///
    /// # Errors
    ///
    /// `InvalidLabel` if the label is empty, longer than [`MAX_LABEL_LEN`],
    /// is `.` or `..`, or contains anything other than ASCII alphanumerics,
    /// `-`, `_` and `.`.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let invalid = |reason: &str| FixchainError::InvalidLabel {
            label: label.clone(),
            reason: reason.to_string(),
        };

        if label.is_empty() {
            return Err(invalid("label cannot be empty"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("label is too long"));
        }
        if label == "." || label == ".." {
            return Err(invalid("label cannot be a relative path segment"));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("character {:?} is not allowed", c)));
        }

        Ok(Self(label))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SnapshotLabel {
    type Err = FixchainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SnapshotLabel {
    type Error = FixchainError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SnapshotLabel {
    type Error = FixchainError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SnapshotLabel> for String {
    fn from(label: SnapshotLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for SnapshotLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
