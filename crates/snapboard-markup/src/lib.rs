//! # snapboard-markup
//!
//! Turns a revision's raw text into display HTML. Each [`MarkupDialect`]
//! maps to one [`Formatter`]; the mapping lives in an immutable
//! [`MarkupRegistry`] built once at startup. Custom dialects are added by
//! registering a formatter for their tag, either on a registry handed to the
//! services or on the global one via [`MarkupRegistry::install_global`].
//! Formatter output is always passed through the sanitizer before it leaves
//! this crate.

pub mod error;
pub mod formatters;
pub mod registry;

mod escape;
mod sanitize;
mod url;

pub use error::MarkupError;
pub use formatters::{
    BbCodeFormatter, Formatted, Formatter, MarkdownFormatter, PlainFormatter, TextileFormatter,
};
pub use registry::{MarkupRegistry, RegistryBuilder, Rendered};
pub use snapboard_core::MarkupDialect;

/// Render with the process-wide registry
pub fn render(text: &str, dialect: &MarkupDialect) -> Result<Rendered, MarkupError> {
    MarkupRegistry::global().render(text, dialect)
}

/// Render using a dialect tag as stored or submitted (`"bbcode"`, ...)
pub fn render_tag(text: &str, tag: &str) -> Result<Rendered, MarkupError> {
    MarkupRegistry::global().render_tag(text, tag)
}
