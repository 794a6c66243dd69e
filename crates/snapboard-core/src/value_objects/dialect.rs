//! Markup dialect tag stored with every revision

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Longest accepted dialect tag
pub const MAX_TAG_LEN: usize = 32;

/// The markup language a revision's raw text is written in.
///
/// Tags outside the built-in four parse to [`MarkupDialect::Custom`]; whether
/// one can be rendered depends on the formatters registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MarkupDialect {
    /// Plain text, only paragraphs and line breaks are kept
    Plain,
    /// Bulletin board code (`[b]bold[/b]`)
    BbCode,
    /// CommonMark
    #[default]
    Markdown,
    /// Textile (`*strong*`, `h1.` blocks)
    Textile,
    /// Any other tag, lowercase. Build with [`MarkupDialect::custom`].
    Custom(Arc<str>),
}

impl MarkupDialect {
    /// Built-in dialects in a stable order
    pub const ALL: [MarkupDialect; 4] = [
        MarkupDialect::Plain,
        MarkupDialect::BbCode,
        MarkupDialect::Markdown,
        MarkupDialect::Textile,
    ];

    /// Dialect for `tag`: a built-in one when the name matches, otherwise a
    /// custom dialect. Tags are 1 to 32 ASCII letters, digits, `-` or `_`.
    pub fn custom(tag: &str) -> Result<Self, DialectParseError> {
        let tag = tag.trim();
        let builtin = Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(tag));
        if let Some(builtin) = builtin {
            return Ok(builtin);
        }
        let well_formed = !tag.is_empty()
            && tag.len() <= MAX_TAG_LEN
            && tag
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !well_formed {
            return Err(DialectParseError(tag.to_string()));
        }
        Ok(Self::Custom(Arc::from(tag.to_ascii_lowercase())))
    }

    /// Tag used in storage and configuration
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain => "plain",
            Self::BbCode => "bbcode",
            Self::Markdown => "markdown",
            Self::Textile => "textile",
            Self::Custom(tag) => tag,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for MarkupDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for malformed tags
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported markup dialect: {0}")]
pub struct DialectParseError(pub String);

impl FromStr for MarkupDialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::custom(s)
    }
}

impl TryFrom<&str> for MarkupDialect {
    type Error = DialectParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for MarkupDialect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MarkupDialect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
