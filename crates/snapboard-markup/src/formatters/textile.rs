//! Textile formatter
//!
//! Block signatures `h1.`-`h6.`, `p.`, `bq.`, `bc.` and `*`/`#` lists, with
//! the inline phrases `*strong*`, `_em_`, `-del-`, `+ins+`, `@code@` and
//! `"text":url` links. Blocks are separated by blank lines.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::plain::split_paragraphs;
use super::{Formatted, Formatter};
use crate::escape::{escape, normalize_newlines, push_escaped};
use crate::url::safe_url;

lazy_static! {
    static ref BLOCK_SIGNATURE: Regex =
        Regex::new(r"^(h[1-6]|p|bq|bc)\.[ \t]+").expect("valid block pattern");
    static ref LINK: Regex =
        Regex::new(r#""([^"\n]+)":([^\s"<>]+)"#).expect("valid link pattern");
    static ref CODE: Regex = Regex::new(r"@([^@\n]+)@").expect("valid code pattern");
    static ref STRONG: Regex =
        Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("valid strong pattern");
    static ref EM: Regex = Regex::new(r"\b_([^_\n]+)_\b").expect("valid em pattern");
    static ref DEL: Regex =
        Regex::new(r"(^|\s)-([^\s-](?:[^-\n]*[^\s-])?)-").expect("valid del pattern");
    static ref INS: Regex =
        Regex::new(r"(^|\s)\+([^\s+](?:[^+\n]*[^\s+])?)\+").expect("valid ins pattern");
}

/// Characters that end a sentence rather than a link target
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

#[derive(Debug, Clone, Copy, Default)]
pub struct TextileFormatter;

impl Formatter for TextileFormatter {
    fn format(&self, text: &str) -> Formatted {
        let text = normalize_newlines(text);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        let mut degraded = false;

        for block in split_paragraphs(&text) {
            degraded |= render_block(block, &mut out);
            out.push('\n');
        }
        Formatted::new(out, degraded)
    }
}

/// Returns whether any part of the block was degraded
fn render_block(block: &str, out: &mut String) -> bool {
    if let Some(caps) = BLOCK_SIGNATURE.captures(block) {
        let signature = caps.get(1).map_or("p", |g| g.as_str());
        let body = caps.get(0).map_or(block, |g| &block[g.end()..]);
        return match signature {
            "bc" => {
                out.push_str("<pre><code>");
                push_escaped(out, body);
                out.push_str("</code></pre>");
                false
            }
            "bq" => {
                out.push_str("<blockquote><p>");
                let degraded = push_lines(out, body);
                out.push_str("</p></blockquote>");
                degraded
            }
            "p" => wrap(out, "p", body),
            heading => wrap(out, heading, body),
        };
    }

    if let Some(items) = list_items(block, "* ") {
        return list(out, "ul", &items);
    }
    if let Some(items) = list_items(block, "# ") {
        return list(out, "ol", &items);
    }
    wrap(out, "p", block)
}

fn wrap(out: &mut String, element: &str, body: &str) -> bool {
    out.push('<');
    out.push_str(element);
    out.push('>');
    let degraded = push_lines(out, body);
    out.push_str("</");
    out.push_str(element);
    out.push('>');
    degraded
}

/// Every line starts with `marker`; returns the lines without it
fn list_items<'a>(block: &'a str, marker: &str) -> Option<Vec<&'a str>> {
    block
        .lines()
        .map(|line| line.strip_prefix(marker))
        .collect()
}

fn list(out: &mut String, element: &str, items: &[&str]) -> bool {
    let mut degraded = false;
    out.push('<');
    out.push_str(element);
    out.push('>');
    for item in items {
        out.push_str("<li>");
        degraded |= push_inline(out, item.trim());
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(element);
    out.push('>');
    degraded
}

fn push_lines(out: &mut String, body: &str) -> bool {
    let mut degraded = false;
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            out.push_str("<br>\n");
        }
        degraded |= push_inline(out, line);
    }
    degraded
}

/// Links first, on raw text, then phrase modifiers on the escaped rest
fn push_inline(out: &mut String, raw: &str) -> bool {
    let mut degraded = false;
    let mut last = 0;

    for caps in LINK.captures_iter(raw) {
        let (Some(whole), Some(label), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        out.push_str(&phrases(&raw[last..whole.start()]));

        // A refused target is dropped whole, punctuation included
        let target_str = target.as_str();
        let url = target_str.trim_end_matches(TRAILING_PUNCTUATION);

        match safe_url(url) {
            Some(href) => {
                out.push_str("<a href=\"");
                push_escaped(out, href);
                out.push_str("\">");
                out.push_str(&phrases(label.as_str()));
                out.push_str("</a>");
                push_escaped(out, &target_str[url.len()..]);
            }
            None => {
                degraded = true;
                out.push_str(&phrases(label.as_str()));
            }
        }
        last = whole.end();
    }
    out.push_str(&phrases(&raw[last..]));
    degraded
}

/// Escape and apply phrase modifiers; `@code@` spans are left alone
fn phrases(raw: &str) -> String {
    let escaped = escape(raw);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut last = 0;

    for caps in CODE.captures_iter(&escaped) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&modifiers(&escaped[last..whole.start()]));
        out.push_str("<code>");
        out.push_str(code.as_str());
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&modifiers(&escaped[last..]));
    out
}

fn modifiers(escaped: &str) -> String {
    let text = STRONG.replace_all(escaped, "<strong>$1</strong>");
    let text = EM.replace_all(&text, "<em>$1</em>");
    let text = DEL.replace_all(&text, |caps: &Captures| {
        format!("{}<del>{}</del>", &caps[1], &caps[2])
    });
    let text = INS.replace_all(&text, |caps: &Captures| {
        format!("{}<ins>{}</ins>", &caps[1], &caps[2])
    });
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> Formatted {
        TextileFormatter.format(text)
    }

    #[test]
    fn test_paragraph_with_phrases() {
        let out = format("a *strong* and _em_ word");
        assert_eq!(
            out.html,
            "<p>a <strong>strong</strong> and <em>em</em> word</p>\n"
        );
        assert!(!out.degraded);
    }

    #[test]
    fn test_del_ins_and_code() {
        let out = format("-old- +new+ @*raw*@");
        assert_eq!(
            out.html,
            "<p><del>old</del> <ins>new</ins> <code>*raw*</code></p>\n"
        );
    }

    #[test]
    fn test_snake_case_and_hyphens_untouched() {
        let out = format("call snake_case_name on a well-known-thing");
        assert_eq!(
            out.html,
            "<p>call snake_case_name on a well-known-thing</p>\n"
        );
    }

    #[test]
    fn test_block_signatures() {
        let out = format("h2. Title\n\nbq. quoted\n\nbc. <b>code</b>\n\np. para");
        assert_eq!(
            out.html,
            "<h2>Title</h2>\n<blockquote><p>quoted</p></blockquote>\n\
             <pre><code>&lt;b&gt;code&lt;/b&gt;</code></pre>\n<p>para</p>\n"
        );
    }

    #[test]
    fn test_lists() {
        let out = format("* one\n* *two*\n\n# first\n# second");
        assert_eq!(
            out.html,
            "<ul><li>one</li><li><strong>two</strong></li></ul>\n\
             <ol><li>first</li><li>second</li></ol>\n"
        );
    }

    #[test]
    fn test_links() {
        let out = format(r#"see "the docs":https://example.com/docs."#);
        assert_eq!(
            out.html,
            "<p>see <a href=\"https://example.com/docs\">the docs</a>.</p>\n"
        );
        assert!(!out.degraded);
    }

    #[test]
    fn test_unsafe_link_keeps_label_only() {
        let out = format(r#""click":javascript:void"#);
        assert_eq!(out.html, "<p>click</p>\n");
        assert!(out.degraded);
    }

    #[test]
    fn test_unsafe_link_drops_trailing_punctuation() {
        let out = format(r#""x":javascript:alert(1)"#);
        assert_eq!(out.html, "<p>x</p>\n");
        assert!(out.degraded);

        let out = format(r#"a "x":javascript:alert(1). b"#);
        assert_eq!(out.html, "<p>a x b</p>\n");
    }

    #[test]
    fn test_html_is_escaped() {
        let out = format("<img src=x onerror=alert(1)>");
        assert_eq!(out.html, "<p>&lt;img src=x onerror=alert(1)&gt;</p>\n");
    }

    #[test]
    fn test_line_breaks() {
        let out = format("one\ntwo");
        assert_eq!(out.html, "<p>one<br>\ntwo</p>\n");
    }
}
