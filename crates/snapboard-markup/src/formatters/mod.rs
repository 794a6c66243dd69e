//! Formatters - one per markup dialect

mod bbcode;
mod markdown;
mod plain;
mod textile;

pub use bbcode::BbCodeFormatter;
pub use markdown::MarkdownFormatter;
pub use plain::PlainFormatter;
pub use textile::TextileFormatter;

/// Raw formatter output, not yet sanitized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formatted {
    pub html: String,
    /// Some of the input could not be interpreted and was shown as text
    /// or dropped.
    pub degraded: bool,
}

impl Formatted {
    pub fn new(html: String, degraded: bool) -> Self {
        Self { html, degraded }
    }

    pub fn clean(html: String) -> Self {
        Self::new(html, false)
    }
}

/// Converts one dialect's raw text to HTML.
///
/// Implementations must be pure and must not panic on any input. Their
/// output is sanitized afterwards, so they only need to produce
/// well-intended markup, not safe markup.
pub trait Formatter: Send + Sync {
    fn format(&self, text: &str) -> Formatted;
}

impl<F> Formatter for F
where
    F: Fn(&str) -> Formatted + Send + Sync,
{
    fn format(&self, text: &str) -> Formatted {
        self(text)
    }
}
