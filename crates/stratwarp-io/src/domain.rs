//! Run naming for output artifacts.

use std::fmt;
use std::str::FromStr;

use crate::IoError;

/// Prefix shared by every artifact of one run, e.g. `north-sea_07`.
///
/// Restricted to ASCII letters, digits, `_` and `-` so it is always safe to
/// splice into a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExperimentName(String);

fn allowed(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-')
}

impl ExperimentName {
    /// # Errors
    ///
    /// [`IoError::InvalidExperimentName`] when `name` is empty or holds a
    /// character outside `[a-zA-Z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, IoError> {
        let name = name.into();
        match name.chars().all(allowed) && !name.is_empty() {
            true => Ok(Self(name)),
            false => Err(IoError::InvalidExperimentName { name }),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{experiment}_{suffix}`
    pub(crate) fn file_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.0)
    }
}

impl FromStr for ExperimentName {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
