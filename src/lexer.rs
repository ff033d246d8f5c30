//! # Line Lexer
//!
//! First stage of parsing: turns a song sheet into classified physical lines, and a
//! content line into bracket / text tokens.
//!
//! ## Preprocessing
//! - Lines are split on `\n` or `\r\n`
//! - One trailing `\` is removed from each line (no joining with the next line)
//! - Blank lines and `#` comment lines are classified so the parser can skip them
//!
//! ## Line classes
//! - `Directive`: the trimmed line is `{name}` or `{name: value}` with `name` made of
//!   ASCII letters and underscores. The name is lowercased, the value trimmed.
//! - `Content`: anything else, kept verbatim (leading spaces included).
//!
//! ## Content tokens
//! `[...]` with at least one character inside is a bracket token; everything else is
//! text. An opening bracket with no closing one, or `[]`, is ordinary text.

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    Directive { name: String, value: &'a str },
    Content(&'a str),
}

/// A token of a content line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentToken<'a> {
    /// Inner text of a `[...]` span, brackets removed.
    Bracket(&'a str),
    Text(&'a str),
}

/// Lexer for song sheet source.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Classify every physical line of the input, in source order.
    pub fn tokenize(&self) -> Vec<LineKind<'a>> {
        self.input
            .lines()
            .map(|raw| classify(strip_continuation(raw)))
            .collect()
    }
}

fn strip_continuation(line: &str) -> &str {
    line.strip_suffix('\\').unwrap_or(line)
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    match parse_directive(trimmed) {
        Some((name, value)) => LineKind::Directive {
            name: name.to_ascii_lowercase(),
            value,
        },
        None => LineKind::Content(line),
    }
}

/// Match `{name[:value]}`; returns the raw name and the trimmed value.
fn parse_directive(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('{')?.strip_suffix('}')?;
    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(inner.len());
    if name_len == 0 {
        return None;
    }
    let (name, rest) = inner.split_at(name_len);
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some((name, rest.trim()))
}

/// Split a content line into bracket and text tokens, in source order.
///
/// Empty text fragments are never produced.
pub fn tokenize_content(text: &str) -> Vec<ContentToken<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('[') {
        let inner_start = search_from + offset + 1;
        match text[inner_start..].find(']') {
            // `[]` is literal; keep looking after it
            Some(0) => search_from = inner_start,
            Some(len) => {
                let open = inner_start - 1;
                if open > literal_start {
                    tokens.push(ContentToken::Text(&text[literal_start..open]));
                }
                tokens.push(ContentToken::Bracket(&text[inner_start..inner_start + len]));
                literal_start = inner_start + len + 1;
                search_from = literal_start;
            }
            None => break,
        }
    }

    if literal_start < text.len() {
        tokens.push(ContentToken::Text(&text[literal_start..]));
    }
    tokens
}
