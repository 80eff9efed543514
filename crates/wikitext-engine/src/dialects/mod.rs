//! The built-in dialects.
//!
//! Each dialect is a function from [`MarkupOptions`] to a [`Dialect`];
//! [`DialectName`] names them for configuration files and command lines.

pub mod asciidoc;
pub mod commonmark;
pub mod confluence;
pub mod google;
pub mod mediawiki;
pub mod textile;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectName {
    Textile,
    Confluence,
    MediaWiki,
    Google,
    AsciiDoc,
    CommonMark,
}

impl DialectName {
    pub const ALL: [DialectName; 6] = [
        Self::Textile,
        Self::Confluence,
        Self::MediaWiki,
        Self::Google,
        Self::AsciiDoc,
        Self::CommonMark,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Textile => "textile",
            Self::Confluence => "confluence",
            Self::MediaWiki => "mediawiki",
            Self::Google => "google",
            Self::AsciiDoc => "asciidoc",
            Self::CommonMark => "commonmark",
        }
    }

    /// Assembles the dialect with the given options.
    pub fn create(self, options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
        match self {
            Self::Textile => textile::textile(options),
            Self::Confluence => confluence::confluence(options),
            Self::MediaWiki => mediawiki::mediawiki(options),
            Self::Google => google::google(options),
            Self::AsciiDoc => asciidoc::asciidoc(options),
            Self::CommonMark => commonmark::commonmark(options),
        }
    }
}

impl fmt::Display for DialectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectName {
    type Err = ConfigurationError;

    /// Case-insensitive; a few common spellings are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "textile" => Ok(Self::Textile),
            "confluence" => Ok(Self::Confluence),
            "mediawiki" | "media-wiki" => Ok(Self::MediaWiki),
            "google" | "googlewiki" | "google-wiki" => Ok(Self::Google),
            "asciidoc" => Ok(Self::AsciiDoc),
            "commonmark" | "markdown" => Ok(Self::CommonMark),
            _ => Err(ConfigurationError::UnknownDialect(s.to_string())),
        }
    }
}
