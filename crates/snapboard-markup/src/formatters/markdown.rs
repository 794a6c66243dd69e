//! CommonMark via pulldown-cmark

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

use super::{Formatted, Formatter};

/// Markdown with tables and strikethrough. Raw HTML in the source is shown
/// as text.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownFormatter {
    options: Options,
}

impl MarkdownFormatter {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new(Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
    }
}

impl Formatter for MarkdownFormatter {
    fn format(&self, text: &str) -> Formatted {
        let mut degraded = false;
        let events = Parser::new_ext(text, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => {
                degraded = true;
                Event::Text(raw)
            }
            Event::Start(Tag::HtmlBlock) => Event::Start(Tag::Paragraph),
            Event::End(TagEnd::HtmlBlock) => Event::End(TagEnd::Paragraph),
            other => other,
        });

        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, events);
        Formatted::new(out, degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> Formatted {
        MarkdownFormatter::default().format(text)
    }

    #[test]
    fn test_strong() {
        let out = format("Hello **world**");
        assert_eq!(out.html, "<p>Hello <strong>world</strong></p>\n");
        assert!(!out.degraded);
    }

    #[test]
    fn test_strikethrough_and_table() {
        let out = format("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.html.contains("<del>gone</del>"));
        assert!(out.html.contains("<table>"));
        assert!(out.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_inline_html_is_text() {
        let out = format("a <b onclick=\"x()\">b</b>");
        assert!(out.degraded);
        assert!(out.html.contains("&lt;b onclick="));
        assert!(!out.html.contains("<b "));
    }

    #[test]
    fn test_html_block_is_text() {
        let out = format("<script>alert(1)</script>\n");
        assert!(out.degraded);
        assert!(out.html.starts_with("<p>&lt;script&gt;"));
        assert!(!out.html.contains("<script>"));
    }

    #[test]
    fn test_unclosed_emphasis_is_literal() {
        let out = format("**never closed");
        assert_eq!(out.html, "<p>**never closed</p>\n");
    }
}
