//! One-token-lookahead tokenizer for Jack source.
//!
//! Scans a whole source string ahead of time into a token list (the grammar
//! only ever needs one token of lookahead, but materializing the list keeps
//! `peek`/`advance` trivial and avoids re-deriving line numbers on demand).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Constructor => "constructor",
            Self::Function => "function",
            Self::Method => "method",
            Self::Field => "field",
            Self::Static => "static",
            Self::Var => "var",
            Self::Int => "int",
            Self::Char => "char",
            Self::Boolean => "boolean",
            Self::Void => "void",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::This => "this",
            Self::Let => "let",
            Self::Do => "do",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Return => "return",
        }
    }
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "class" => Keyword::Class,
    "constructor" => Keyword::Constructor,
    "function" => Keyword::Function,
    "method" => Keyword::Method,
    "field" => Keyword::Field,
    "static" => Keyword::Static,
    "var" => Keyword::Var,
    "int" => Keyword::Int,
    "char" => Keyword::Char,
    "boolean" => Keyword::Boolean,
    "void" => Keyword::Void,
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
    "this" => Keyword::This,
    "let" => Keyword::Let,
    "do" => Keyword::Do,
    "if" => Keyword::If,
    "else" => Keyword::Else,
    "while" => Keyword::While,
    "return" => Keyword::Return,
};

static SYMBOLS: phf::Set<char> = phf::phf_set! {
    '{', '}', '(', ')', '[', ']', '.', ',', ';',
    '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(char),
    IntegerConstant(u16),
    StringConstant(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

#[derive(Debug)]
pub enum LexError {
    UnterminatedString { line: usize },
    UnterminatedComment { line: usize },
    IntegerOutOfRange { line: usize, value: String },
    UnexpectedCharacter { line: usize, ch: char },
}

impl std::error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString { line } => write!(f, "unterminated string (line {line})"),
            Self::UnterminatedComment { line } => write!(f, "unterminated comment (line {line})"),
            Self::IntegerOutOfRange { line, value } => {
                write!(f, "integer constant out of range: {value} (line {line})")
            }
            Self::UnexpectedCharacter { line, ch } => {
                write!(f, "unexpected character '{ch}' (line {line})")
            }
        }
    }
}

impl LexError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::UnterminatedComment { line }
            | Self::IntegerOutOfRange { line, .. }
            | Self::UnexpectedCharacter { line, .. } => *line,
        }
    }
}

/// A one-token-lookahead stream over Jack source text.
#[derive(Debug)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = scan_all(source)?;
        Ok(Self { tokens, pos: 0 })
    }

    /// The current token, or `None` once the stream is exhausted.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    #[must_use]
    pub fn kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.peek().map_or(0, |t| t.line)
    }

    /// Consumes the current token. Returns whether another token remains.
    pub fn advance(&mut self) -> bool {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.pos < self.tokens.len()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pos < self.tokens.len()
    }
}

fn scan_all(source: &str) -> Result<Vec<Token>, LexError> {
    let bytes = source.as_bytes();
    let mut pos = 0usize;
    let mut line = 1usize;
    let mut tokens = Vec::new();

    loop {
        skip_whitespace_and_comments(bytes, &mut pos, &mut line)?;
        if pos >= bytes.len() {
            break;
        }

        let start_line = line;
        let ch = bytes[pos] as char;

        if ch == '"' {
            tokens.push(Token {
                kind: TokenKind::StringConstant(read_string(bytes, &mut pos, &mut line)?),
                line: start_line,
            });
        } else if ch.is_ascii_digit() {
            tokens.push(Token {
                kind: read_number(bytes, &mut pos, start_line)?,
                line: start_line,
            });
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let word = read_identifier(bytes, &mut pos);
            let kind = KEYWORDS
                .get(word.as_str())
                .map_or_else(|| TokenKind::Identifier(word.clone()), |kw| TokenKind::Keyword(*kw));
            tokens.push(Token { kind, line: start_line });
        } else if SYMBOLS.contains(&ch) {
            pos += 1;
            tokens.push(Token {
                kind: TokenKind::Symbol(ch),
                line: start_line,
            });
        } else {
            return Err(LexError::UnexpectedCharacter { line, ch });
        }
    }

    Ok(tokens)
}

fn skip_whitespace_and_comments(
    bytes: &[u8],
    pos: &mut usize,
    line: &mut usize,
) -> Result<(), LexError> {
    loop {
        match bytes.get(*pos) {
            Some(b'\n') => {
                *line += 1;
                *pos += 1;
            }
            Some(b' ' | b'\t' | b'\r') => {
                *pos += 1;
            }
            Some(b'/') if bytes.get(*pos + 1) == Some(&b'/') => {
                *pos += 2;
                while !matches!(bytes.get(*pos), Some(b'\n') | None) {
                    *pos += 1;
                }
            }
            Some(b'/') if bytes.get(*pos + 1) == Some(&b'*') => {
                let start_line = *line;
                *pos += 2;
                loop {
                    match bytes.get(*pos) {
                        Some(b'*') if bytes.get(*pos + 1) == Some(&b'/') => {
                            *pos += 2;
                            break;
                        }
                        Some(b'\n') => {
                            *line += 1;
                            *pos += 1;
                        }
                        Some(_) => *pos += 1,
                        None => {
                            return Err(LexError::UnterminatedComment { line: start_line })
                        }
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

fn read_string(bytes: &[u8], pos: &mut usize, line: &mut usize) -> Result<String, LexError> {
    let start_line = *line;
    *pos += 1; // opening quote
    let start = *pos;
    loop {
        match bytes.get(*pos) {
            Some(b'"') => {
                let text = String::from_utf8_lossy(&bytes[start..*pos]).into_owned();
                *pos += 1;
                return Ok(text);
            }
            Some(b'\n') | None => return Err(LexError::UnterminatedString { line: start_line }),
            Some(_) => *pos += 1,
        }
    }
}

fn read_number(bytes: &[u8], pos: &mut usize, line: usize) -> Result<TokenKind, LexError> {
    let start = *pos;
    while matches!(bytes.get(*pos), Some(b) if b.is_ascii_digit()) {
        *pos += 1;
    }
    let text = std::str::from_utf8(&bytes[start..*pos]).unwrap();
    text.parse::<u16>()
        .ok()
        .filter(|&v| v <= 32767)
        .map(TokenKind::IntegerConstant)
        .ok_or_else(|| LexError::IntegerOutOfRange {
            line,
            value: text.to_string(),
        })
}

fn read_identifier(bytes: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while matches!(bytes.get(*pos), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
        *pos += 1;
    }
    String::from_utf8_lossy(&bytes[start..*pos]).into_owned()
}
