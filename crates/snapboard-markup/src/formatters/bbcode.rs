//! BBCode formatter
//!
//! Supported tags (names are case-insensitive):
//! `[b] [i] [u] [s] [quote] [quote=name] [code] [url] [url=target] [img]
//! [list] [list=1] [*]`.
//!
//! Anything that cannot be matched up is written back out as literal text
//! and the result is flagged as degraded. Unknown tags are plain text.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Formatted, Formatter};
use crate::escape::{normalize_newlines, push_escaped};
use crate::url::safe_url;

lazy_static! {
    static ref TAG: Regex =
        Regex::new(r"\[(/?)([A-Za-z]+|\*)(?:=([^\]\n]*))?\]").expect("valid bbcode tag pattern");
}

const BREAK: &str = "<br>\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct BbCodeFormatter;

impl Formatter for BbCodeFormatter {
    fn format(&self, text: &str) -> Formatted {
        let text = normalize_newlines(text);
        let mut renderer = Renderer::default();
        let mut pos = 0;

        while let Some(caps) = TAG.captures_at(&text, pos) {
            let Some(whole) = caps.get(0) else { break };
            renderer.text(&text[pos..whole.start()]);
            pos = whole.end();

            let raw = whole.as_str();
            let closing = caps.get(1).is_some_and(|g| !g.as_str().is_empty());
            let arg = caps.get(3).map(|g| g.as_str());
            let Some(kind) = caps.get(2).and_then(|g| TagKind::from_name(g.as_str())) else {
                renderer.literal(raw, false);
                continue;
            };

            if closing {
                renderer.close(kind, raw);
            } else if kind.has_raw_body(arg) {
                match raw_body(&text[pos..], kind.name()) {
                    Some((body, consumed)) => {
                        renderer.raw_element(kind, body);
                        pos += consumed;
                    }
                    None => renderer.literal(raw, true),
                }
            } else {
                renderer.open(kind, arg, raw);
            }
        }
        renderer.text(&text[pos..]);
        renderer.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Quote,
    Code,
    Url,
    Img,
    List,
    Item,
}

impl TagKind {
    fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "b" => Self::Bold,
            "i" => Self::Italic,
            "u" => Self::Underline,
            "s" => Self::Strike,
            "quote" => Self::Quote,
            "code" => Self::Code,
            "url" => Self::Url,
            "img" => Self::Img,
            "list" => Self::List,
            "*" => Self::Item,
            _ => return None,
        };
        Some(kind)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Strike => "s",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::Url => "url",
            Self::Img => "img",
            Self::List => "list",
            Self::Item => "*",
        }
    }

    /// Tags whose content is taken verbatim up to the closing tag
    fn has_raw_body(self, arg: Option<&str>) -> bool {
        match self {
            Self::Code | Self::Img => true,
            Self::Url => arg.is_none(),
            _ => false,
        }
    }

    fn inline_element(self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("strong"),
            Self::Italic => Some("em"),
            Self::Underline => Some("u"),
            Self::Strike => Some("del"),
            _ => None,
        }
    }
}

/// Content up to the case-insensitive `[/name]`, and the number of bytes
/// consumed including the closing tag.
fn raw_body<'a>(rest: &'a str, name: &str) -> Option<(&'a str, usize)> {
    let closing = format!("[/{name}]");
    // ASCII lowercasing keeps byte offsets intact
    let idx = rest.to_ascii_lowercase().find(&closing)?;
    Some((&rest[..idx], idx + closing.len()))
}

fn trim_breaks(mut body: &str) -> &str {
    while let Some(rest) = body.strip_prefix(BREAK) {
        body = rest;
    }
    while let Some(rest) = body.strip_suffix(BREAK) {
        body = rest;
    }
    body
}

struct Frame<'a> {
    kind: TagKind,
    arg: Option<&'a str>,
    raw: &'a str,
    body: String,
}

#[derive(Default)]
struct Renderer<'a> {
    root: String,
    stack: Vec<Frame<'a>>,
    degraded: bool,
    /// A block element just closed; swallow one newline after it
    after_block: bool,
}

impl<'a> Renderer<'a> {
    fn out(&mut self) -> &mut String {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn top_kind(&self) -> Option<TagKind> {
        self.stack.last().map(|frame| frame.kind)
    }

    fn text(&mut self, text: &str) {
        let text = if std::mem::take(&mut self.after_block) {
            text.strip_prefix('\n').unwrap_or(text)
        } else {
            text
        };
        if text.is_empty() || (self.top_kind() == Some(TagKind::List) && text.trim().is_empty()) {
            return;
        }
        let out = self.out();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push_str(BREAK);
            }
            push_escaped(out, line);
        }
    }

    fn literal(&mut self, raw: &str, degraded: bool) {
        self.degraded |= degraded;
        push_escaped(self.out(), raw);
    }

    fn open(&mut self, kind: TagKind, arg: Option<&'a str>, raw: &'a str) {
        if kind == TagKind::Item {
            if self.top_kind() == Some(TagKind::Item) {
                self.pop_and_render();
            }
            if self.top_kind() != Some(TagKind::List) {
                self.literal(raw, true);
                return;
            }
        }
        self.stack.push(Frame {
            kind,
            arg,
            raw,
            body: String::new(),
        });
    }

    fn close(&mut self, kind: TagKind, raw: &str) {
        let Some(idx) = self.stack.iter().rposition(|frame| frame.kind == kind) else {
            self.literal(raw, true);
            return;
        };
        while self.stack.len() > idx + 1 {
            // List items close implicitly; anything else is misnested
            let implicit_item = self.top_kind() == Some(TagKind::Item)
                && self.stack.len() >= 2
                && self.stack[self.stack.len() - 2].kind == TagKind::List;
            self.degraded |= !implicit_item;
            self.pop_and_render();
        }
        self.pop_and_render();
    }

    fn pop_and_render(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let mut html = String::with_capacity(frame.body.len() + 32);
        let mut block = false;

        if let Some(element) = frame.kind.inline_element() {
            html.push('<');
            html.push_str(element);
            html.push('>');
            html.push_str(&frame.body);
            html.push_str("</");
            html.push_str(element);
            html.push('>');
        } else {
            match frame.kind {
                TagKind::Quote => {
                    html.push_str("<blockquote>");
                    if let Some(name) = frame.arg.map(str::trim).filter(|n| !n.is_empty()) {
                        html.push_str("<cite>");
                        push_escaped(&mut html, name);
                        html.push_str("</cite>");
                    }
                    html.push_str(trim_breaks(&frame.body));
                    html.push_str("</blockquote>");
                    block = true;
                }
                TagKind::Url => match frame.arg.and_then(safe_url) {
                    Some(href) => {
                        html.push_str("<a href=\"");
                        push_escaped(&mut html, href);
                        html.push_str("\">");
                        html.push_str(&frame.body);
                        html.push_str("</a>");
                    }
                    None => {
                        self.degraded = true;
                        html.push_str(&frame.body);
                    }
                },
                TagKind::List => {
                    let element = if frame.arg.is_some() { "ol" } else { "ul" };
                    html.push('<');
                    html.push_str(element);
                    html.push('>');
                    html.push_str(&frame.body);
                    html.push_str("</");
                    html.push_str(element);
                    html.push('>');
                    block = true;
                }
                TagKind::Item => {
                    html.push_str("<li>");
                    html.push_str(trim_breaks(&frame.body));
                    html.push_str("</li>");
                }
                _ => html.push_str(&frame.body),
            }
        }

        self.out().push_str(&html);
        self.after_block = block;
    }

    /// `[code]`, `[img]` and bare `[url]`, whose body is not parsed
    fn raw_element(&mut self, kind: TagKind, body: &str) {
        let mut html = String::with_capacity(body.len() + 32);
        match kind {
            TagKind::Code => {
                html.push_str("<pre><code>");
                push_escaped(&mut html, body.trim_matches('\n'));
                html.push_str("</code></pre>");
                self.out().push_str(&html);
                self.after_block = true;
                return;
            }
            TagKind::Url => match safe_url(body) {
                Some(href) => {
                    html.push_str("<a href=\"");
                    push_escaped(&mut html, href);
                    html.push_str("\">");
                    push_escaped(&mut html, href);
                    html.push_str("</a>");
                }
                None => {
                    self.degraded = true;
                    push_escaped(&mut html, body);
                }
            },
            TagKind::Img => match safe_url(body) {
                Some(src) => {
                    html.push_str("<img src=\"");
                    push_escaped(&mut html, src);
                    html.push_str("\" alt=\"\">");
                }
                None => {
                    self.degraded = true;
                    push_escaped(&mut html, body);
                }
            },
            _ => push_escaped(&mut html, body),
        }
        self.out().push_str(&html);
    }

    /// Unclosed tags are flattened back into literal text
    fn finish(mut self) -> Formatted {
        while let Some(frame) = self.stack.pop() {
            self.degraded = true;
            let out = self.out();
            push_escaped(out, frame.raw);
            out.push_str(&frame.body);
        }
        Formatted::new(self.root, self.degraded)
    }
}
