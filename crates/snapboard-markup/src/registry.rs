//! Dialect registry
//!
//! A registry is assembled once with [`RegistryBuilder`] and never changes
//! afterwards, so it can be shared freely between threads. The process-wide
//! registry is the standard one unless [`MarkupRegistry::install_global`]
//! ran before its first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use snapboard_core::MarkupDialect;
use tracing::{debug, info};

use crate::error::MarkupError;
use crate::formatters::{
    BbCodeFormatter, Formatted, Formatter, MarkdownFormatter, PlainFormatter, TextileFormatter,
};
use crate::sanitize::sanitize;

static GLOBAL: OnceLock<MarkupRegistry> = OnceLock::new();

/// Sanitized render result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Part of the input could not be interpreted. Informational only.
    pub degraded: bool,
}

/// Immutable `{dialect -> formatter}` table
#[derive(Clone)]
pub struct MarkupRegistry {
    formatters: HashMap<MarkupDialect, Arc<dyn Formatter>>,
}

impl MarkupRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with the built-in formatter for every built-in dialect
    pub fn standard() -> Self {
        RegistryBuilder::standard().build()
    }

    /// Process-wide registry, the standard one if nothing was installed
    pub fn global() -> &'static MarkupRegistry {
        GLOBAL.get_or_init(Self::standard)
    }

    /// Make `builder`'s registry the process-wide one.
    ///
    /// Only the first call before any use of [`MarkupRegistry::global`]
    /// succeeds; later calls fail with `GlobalAlreadySet` and change nothing.
    pub fn install_global(
        builder: RegistryBuilder,
    ) -> Result<&'static MarkupRegistry, MarkupError> {
        let mut installed = false;
        let registry = GLOBAL.get_or_init(|| {
            installed = true;
            builder.build()
        });
        if !installed {
            return Err(MarkupError::GlobalAlreadySet);
        }
        info!(dialects = ?registry.dialects(), "Installed global markup registry");
        Ok(registry)
    }

    /// Render `text` and sanitize the result.
    ///
    /// Never fails on the text itself; only a dialect without a registered
    /// formatter is an error.
    pub fn render(&self, text: &str, dialect: &MarkupDialect) -> Result<Rendered, MarkupError> {
        let formatter = self
            .formatters
            .get(dialect)
            .ok_or_else(|| MarkupError::UnsupportedDialect(dialect.to_string()))?;

        let Formatted { html, degraded } = formatter.format(text);
        if degraded {
            debug!(%dialect, len = text.len(), "Rendered with degraded fidelity");
        }

        Ok(Rendered {
            html: sanitize(&html),
            degraded,
        })
    }

    /// Render with a dialect tag (`"markdown"`, `"BBCode"`, ...)
    pub fn render_tag(&self, text: &str, tag: &str) -> Result<Rendered, MarkupError> {
        let dialect: MarkupDialect = tag.parse()?;
        self.render(text, &dialect)
    }

    pub fn supports(&self, dialect: &MarkupDialect) -> bool {
        self.formatters.contains_key(dialect)
    }

    /// Registered dialects, built-in ones first, then custom tags by name
    pub fn dialects(&self) -> Vec<MarkupDialect> {
        let mut dialects: Vec<MarkupDialect> = self.formatters.keys().cloned().collect();
        dialects.sort();
        dialects
    }
}

impl Default for MarkupRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for MarkupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupRegistry")
            .field("dialects", &self.dialects())
            .finish()
    }
}

/// Collects formatters before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    formatters: HashMap<MarkupDialect, Arc<dyn Formatter>>,
}

impl RegistryBuilder {
    /// Builder holding the built-in formatters, ready for more
    pub fn standard() -> Self {
        Self::default()
            .register(MarkupDialect::Plain, PlainFormatter)
            .register(MarkupDialect::BbCode, BbCodeFormatter)
            .register(MarkupDialect::Markdown, MarkdownFormatter::default())
            .register(MarkupDialect::Textile, TextileFormatter)
    }

    /// Register a formatter, replacing any earlier one for the dialect
    pub fn register<F>(self, dialect: MarkupDialect, formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        self.register_arc(dialect, Arc::new(formatter))
    }

    pub fn register_arc(mut self, dialect: MarkupDialect, formatter: Arc<dyn Formatter>) -> Self {
        self.formatters.insert(dialect, formatter);
        self
    }

    pub fn build(self) -> MarkupRegistry {
        MarkupRegistry {
            formatters: self.formatters,
        }
    }
}
