use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Code that asks the recognizer to detect the spoken language itself.
pub const AUTO_DETECT: &str = "auto";

/// Language code handed to the recognizer exactly as given.
///
/// The code is not checked against any list; whisper.cpp falls back to its
/// default when it does not know a code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language(String);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("language code must not be empty")]
pub struct EmptyLanguageCode;

impl Language {
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0.eq_ignore_ascii_case(AUTO_DETECT)
    }
}

impl FromStr for Language {
    type Err = EmptyLanguageCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(EmptyLanguageCode);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
