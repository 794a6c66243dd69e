//! Plain text: escaped, paragraphs on blank lines, `<br>` on single newlines

use super::{Formatted, Formatter};
use crate::escape::{normalize_newlines, push_escaped};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, text: &str) -> Formatted {
        let text = normalize_newlines(text);
        let mut out = String::with_capacity(text.len() + 16);
        for paragraph in split_paragraphs(&text) {
            out.push_str("<p>");
            for (i, line) in paragraph.lines().enumerate() {
                if i > 0 {
                    out.push_str("<br>\n");
                }
                push_escaped(&mut out, line);
            }
            out.push_str("</p>\n");
        }
        Formatted::clean(out)
    }
}

/// Non-empty blocks separated by blank lines
pub(crate) fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_breaks() {
        let out = PlainFormatter.format("one\ntwo\r\n\r\nthree");
        assert_eq!(out.html, "<p>one<br>\ntwo</p>\n<p>three</p>\n");
        assert!(!out.degraded);
    }

    #[test]
    fn test_escapes_markup() {
        let out = PlainFormatter.format("<b>not bold</b> & **not strong**");
        assert_eq!(
            out.html,
            "<p>&lt;b&gt;not bold&lt;/b&gt; &amp; **not strong**</p>\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PlainFormatter.format("").html, "");
        assert_eq!(PlainFormatter.format("\n\n  \n").html, "");
    }
}
