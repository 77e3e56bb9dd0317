use std::fmt;

use serde::{Deserialize, Serialize};

/// Wrapper for sensitive strings containing credentials.
///
/// Formatting never shows the inner value; use [`SensitiveString::inner`] where the secret is
/// actually needed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SensitiveString(String);

impl From<String> for SensitiveString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SensitiveString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<SensitiveString> for String {
    fn from(value: SensitiveString) -> Self {
        value.0
    }
}

impl fmt::Display for SensitiveString {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "**REDACTED**")
    }
}

impl fmt::Debug for SensitiveString {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // we keep the double quotes here to keep the String behavior
        write!(fmt, "\"**REDACTED**\"")
    }
}

impl SensitiveString {
    #[must_use]
    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}
