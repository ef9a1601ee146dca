use std::fmt;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

use crate::core::data::Scalar;

/// Closing tag of a `{% verbatim %}` / `{% raw %}` section.
static VERBATIM_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%(-?)\s*end(?:verbatim|raw)\s*(-?)%\}").expect("valid verbatim regex")
});

/// Opening of a `{% verbatim %}` / `{% raw %}` tag, matched right after `{%`.
static VERBATIM_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\s*(?:verbatim|raw)\s*(-?)%\}").expect("valid verbatim regex"));

/// Symbol operators, longest first.
const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "..", "//", "**", "??", "+", "-", "*", "/", "%", "~", "<", ">",
];

/// Word operators containing characters that are not valid in names.
const DASHED_OPERATORS: &[&str] = &["b-and", "b-xor", "b-or"];

const PUNCTUATION: &[char] = &['(', ')', '[', ']', '{', '}', '?', ':', '.', ',', '|', '='];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Text(String),
    VarStart,
    VarEnd,
    BlockStart,
    BlockEnd,
    Name(String),
    Number(Scalar),
    Str(String),
    Operator(String),
    Punctuation(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Text(_) => write!(f, "text"),
            TokenKind::VarStart => write!(f, "{{{{"),
            TokenKind::VarEnd => write!(f, "}}}}"),
            TokenKind::BlockStart => write!(f, "{{%"),
            TokenKind::BlockEnd => write!(f, "%}}"),
            TokenKind::Name(name) => write!(f, "{}", name),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Punctuation(c) => write!(f, "{}", c),
            TokenKind::Eof => write!(f, "end of template"),
        }
    }
}

/// Split template source into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer {
        src: source,
        pos: 0,
        line: 1,
        tokens: Vec::new(),
        trim_next_text: false,
    };
    lexer.lex_data()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    /// Set by `-}}`, `-%}` and `-#}`: strip leading whitespace of the next text.
    trim_next_text: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Var,
    Block,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn advance(&mut self, len: usize) {
        self.line += self.src[self.pos..self.pos + len].matches('\n').count();
        self.pos += len;
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    fn push_text(&mut self, mut text: &str, trim_end: bool, line: usize) {
        if std::mem::take(&mut self.trim_next_text) {
            text = text.trim_start();
        }
        if trim_end {
            text = text.trim_end();
        }
        if !text.is_empty() {
            self.push(TokenKind::Text(text.to_string()), line);
        }
    }

    fn lex_data(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            let Some(start) = ["{{", "{%", "{#"].iter().filter_map(|m| rest.find(m)).min() else {
                let line = self.line;
                self.push_text(rest, false, line);
                self.advance(rest.len());
                break;
            };

            let marker = &rest[start..start + 2];
            let trim_before = rest[start + 2..].starts_with('-');
            let line = self.line;
            self.push_text(&rest[..start], trim_before, line);
            self.advance(start);

            match marker {
                "{#" => self.lex_comment()?,
                "{{" => {
                    let line = self.line;
                    self.advance(2 + usize::from(trim_before));
                    self.push(TokenKind::VarStart, line);
                    self.lex_expression(TagKind::Var)?;
                }
                _ => {
                    if let Some(caps) = VERBATIM_START.captures(&self.rest()[2..]) {
                        let len = 2 + caps[0].len();
                        self.trim_next_text = !caps[1].is_empty();
                        self.advance(len);
                        if !self.trim_next_text {
                            self.skip_newline();
                        }
                        self.lex_verbatim()?;
                        continue;
                    }
                    let line = self.line;
                    self.advance(2 + usize::from(trim_before));
                    self.push(TokenKind::BlockStart, line);
                    self.lex_expression(TagKind::Block)?;
                }
            }
        }

        let line = self.line;
        self.push(TokenKind::Eof, line);
        Ok(())
    }

    fn lex_comment(&mut self) -> Result<()> {
        let line = self.line;
        let Some(end) = self.rest().find("#}") else {
            bail!("Unclosed comment at line {}", line);
        };
        self.trim_next_text = self.rest()[..end].ends_with('-');
        self.advance(end + 2);
        self.skip_newline();
        Ok(())
    }

    fn lex_verbatim(&mut self) -> Result<()> {
        let line = self.line;
        let rest = self.rest();
        let Some(caps) = VERBATIM_END.captures(rest) else {
            bail!("Unclosed verbatim section at line {}", line);
        };
        let whole = caps.get(0).expect("capture 0 always present");
        let trim_before = !caps[1].is_empty();
        let trim_after = !caps[2].is_empty();

        self.push_text(&rest[..whole.start()], trim_before, line);
        self.advance(whole.end());
        self.trim_next_text = trim_after;
        self.skip_newline();
        Ok(())
    }

    /// Remove a single newline directly after a block tag or comment.
    fn skip_newline(&mut self) {
        if self.rest().starts_with("\r\n") {
            self.advance(2);
        } else if self.rest().starts_with('\n') {
            self.advance(1);
        }
    }

    fn lex_expression(&mut self, tag: TagKind) -> Result<()> {
        let start_line = self.line;
        let mut brackets: Vec<(char, usize)> = Vec::new();

        loop {
            let ws = self.rest().len() - self.rest().trim_start().len();
            self.advance(ws);

            let rest = self.rest();
            if rest.is_empty() {
                let what = match tag {
                    TagKind::Var => "variable",
                    TagKind::Block => "block",
                };
                bail!("Unclosed {} starting at line {}", what, start_line);
            }

            if brackets.is_empty() {
                let end = match tag {
                    TagKind::Var => "}}",
                    TagKind::Block => "%}",
                };
                let trim = rest.starts_with('-') && rest[1..].starts_with(end);
                if trim || rest.starts_with(end) {
                    let line = self.line;
                    self.advance(end.len() + usize::from(trim));
                    match tag {
                        TagKind::Var => self.push(TokenKind::VarEnd, line),
                        TagKind::Block => {
                            self.push(TokenKind::BlockEnd, line);
                            if !trim {
                                self.skip_newline();
                            }
                        }
                    }
                    self.trim_next_text = trim;
                    return Ok(());
                }
            }

            let line = self.line;
            let c = rest.chars().next().expect("rest is not empty");

            if c.is_ascii_digit() {
                let len = number_len(rest);
                let literal = &rest[..len];
                let value = match literal.parse::<i64>() {
                    Ok(n) => Scalar::Int(n),
                    Err(_) => match literal.parse::<f64>() {
                        Ok(f) => Scalar::Float(f),
                        Err(_) => bail!("Invalid number \"{}\" at line {}", literal, line),
                    },
                };
                self.advance(len);
                self.push(TokenKind::Number(value), line);
            } else if c == '\'' || c == '"' {
                let (value, len) = lex_string(rest, c)
                    .ok_or_else(|| anyhow::anyhow!("Unclosed string at line {}", line))?;
                self.advance(len);
                self.push(TokenKind::Str(value), line);
            } else if let Some(op) = DASHED_OPERATORS
                .iter()
                .find(|op| rest.starts_with(**op) && !rest[op.len()..].starts_with(is_name_char))
            {
                self.advance(op.len());
                self.push(TokenKind::Operator(op.to_string()), line);
            } else if is_name_start(c) {
                let len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
                let name = rest[..len].to_string();
                self.advance(len);
                self.push(TokenKind::Name(name), line);
            } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                self.advance(op.len());
                self.push(TokenKind::Operator(op.to_string()), line);
            } else if PUNCTUATION.contains(&c) {
                match c {
                    '(' | '[' | '{' => brackets.push((c, line)),
                    ')' | ']' | '}' => {
                        let expected = match c {
                            ')' => '(',
                            ']' => '[',
                            _ => '{',
                        };
                        match brackets.pop() {
                            Some((open, _)) if open == expected => {}
                            Some((open, open_line)) => bail!(
                                "Unclosed \"{}\" from line {} (found \"{}\" at line {})",
                                open,
                                open_line,
                                c,
                                line
                            ),
                            None => bail!("Unexpected \"{}\" at line {}", c, line),
                        }
                    }
                    _ => {}
                }
                self.advance(1);
                self.push(TokenKind::Punctuation(c), line);
            } else {
                bail!("Unexpected character \"{}\" at line {}", c, line);
            }
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

/// Length of `[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?` at the start of `s`.
fn number_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = digits_from(0);
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end = digits_from(end + 1);
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut i = end + 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        if i < bytes.len() && bytes[i].is_ascii_digit() {
            end = digits_from(i);
        }
    }
    end
}

/// Read a quoted string starting at `s[0]`; returns its value and the
/// number of bytes consumed.
fn lex_string(s: &str, quote: char) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' | '\'' | '"' => value.push(escaped),
                    other => {
                        value.push('\\');
                        value.push(other);
                    }
                }
            }
            c if c == quote => return Some((value, i + 1)),
            c => value.push(c),
        }
    }
    None
}
