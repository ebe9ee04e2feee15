#![allow(dead_code)]

use std::path::Path;

use harness::{HighlightError, Highlighted, Highlighter};

pub const COMMENT: &str = r#"<span class="hljs-comment">"#;
pub const KEYWORD: &str = r#"<span class="hljs-keyword">"#;
pub const SECTION: &str = r#"<span class="hljs-section">"#;

const KEYWORDS: &[&str] = &["int", "return", "void"];

/// Lexer context of [`ToyHighlighter`] at the end of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Code,
    Comment,
}

/// Highlights two languages:
/// - `clike`: `/* */` block comments (which may span lines) and a few keywords;
/// - `setext`: a line underlined by `===` is a heading. Recognizing it needs
///   the next line, so a line-at-a-time pass never finds one.
///
/// Any other language is rejected.
#[derive(Debug, Default)]
pub struct ToyHighlighter;

impl Highlighter for ToyHighlighter {
    type State = Mode;

    async fn highlight(
        &mut self,
        language: &str,
        code: &str,
        continuation: Option<&Mode>,
    ) -> Result<Highlighted<Mode>, HighlightError> {
        let mode = continuation.copied().unwrap_or(Mode::Code);
        match language {
            "clike" => {
                let (value, top) = highlight_clike(code, mode);
                Ok(Highlighted { value, top })
            }
            "setext" => Ok(Highlighted {
                value: highlight_setext(code),
                top: Mode::Code,
            }),
            other => Err(HighlightError::Rejected {
                language: other.to_string(),
                message: format!("Unknown language: \"{}\"", other),
            }),
        }
    }
}

pub fn highlight_clike(code: &str, mut mode: Mode) -> (String, Mode) {
    let mut out = String::new();
    let mut rest = code;
    while let Some(ch) = rest.chars().next() {
        if mode == Mode::Comment || rest.starts_with("/*") {
            let skip = if mode == Mode::Comment { 0 } else { 2 };
            let (body, closed) = match rest[skip..].find("*/") {
                Some(end) => (&rest[..skip + end + 2], true),
                None => (rest, false),
            };
            out.push_str(COMMENT);
            escape_into(&mut out, body);
            out.push_str("</span>");
            rest = &rest[body.len()..];
            mode = if closed { Mode::Code } else { Mode::Comment };
        } else if ch.is_ascii_alphabetic() {
            let len = rest
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(rest.len());
            let word = &rest[..len];
            if KEYWORDS.contains(&word) {
                out.push_str(KEYWORD);
                out.push_str(word);
                out.push_str("</span>");
            } else {
                out.push_str(word);
            }
            rest = &rest[len..];
        } else {
            escape_into(&mut out, &rest[..ch.len_utf8()]);
            rest = &rest[ch.len_utf8()..];
        }
    }
    (out, mode)
}

pub fn highlight_setext(code: &str) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut out = String::new();
    let mut i = 0;
    while i < lines.len() {
        let underlined = lines
            .get(i + 1)
            .is_some_and(|next| !next.is_empty() && next.chars().all(|c| c == '='));
        if underlined && !lines[i].trim().is_empty() {
            out.push_str(SECTION);
            escape_into(&mut out, lines[i]);
            out.push('\n');
            out.push_str(lines[i + 1]);
            out.push_str("</span>");
            i += 2;
        } else {
            escape_into(&mut out, lines[i]);
            i += 1;
        }
        if i < lines.len() {
            out.push('\n');
        }
    }
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
}

/// Wraps a highlighter and records every call it receives.
pub struct Recording<H: Highlighter> {
    pub inner: H,
    pub calls: Vec<(String, Option<H::State>)>,
}

impl<H: Highlighter> Recording<H> {
    pub fn new(inner: H) -> Self {
        Recording {
            inner,
            calls: Vec::new(),
        }
    }
}

impl<H: Highlighter> Highlighter for Recording<H> {
    type State = H::State;

    async fn highlight(
        &mut self,
        language: &str,
        code: &str,
        continuation: Option<&H::State>,
    ) -> Result<Highlighted<H::State>, HighlightError> {
        self.calls.push((code.to_string(), continuation.cloned()));
        self.inner.highlight(language, code, continuation).await
    }
}

/// Write `<root>/<language>/<name>` and its expectation file.
pub fn write_fixture(root: &Path, language: &str, name: &str, source: &str, expected: &str) {
    let dir = root.join(language);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), source).unwrap();
    std::fs::write(dir.join(format!("{}.expect.txt", name)), expected).unwrap();
}
