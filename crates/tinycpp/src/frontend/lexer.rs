//! Tokenizer: identifiers, keywords, the four declared scalar type names,
//! literals, and the operator/punctuation set the grammar uses. Control
//! flow is limited to `if`/`else`/`for`/`return`; there is no `while` and
//! no logical operators.

use crate::exception::{lex_error, TinyResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    IntLit(i64),
    DoubleLit(f64),
    StringLit(Vec<u8>),
    True,
    False,
    Null,

    // Type keywords.
    KwInt,
    KwDouble,
    KwString,
    KwBool,
    KwAuto,

    // Control-flow / statement keywords.
    KwIf,
    KwElse,
    KwFor,
    KwReturn,
    KwCout,
    KwCin,

    // Punctuation.
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // Operators.
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    EqEq,
    NotEq,
    Assign,
    Shl, // `<<`, used both for `cout <<` and nowhere else
    Shr, // `>>`, used for `cin >>`

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(byte)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scans the whole source into a token stream, terminated by [`Token::Eof`].
    pub fn tokenize(mut self) -> TinyResult<Vec<Spanned>> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, col) = (self.line, self.col);
            let Some(b) = self.peek() else {
                out.push(Spanned {
                    token: Token::Eof,
                    line,
                    col,
                });
                break;
            };
            let token = self.scan_one(b, line, col)?;
            out.push(Spanned { token, line, col });
        }
        Ok(out)
    }

    fn scan_one(&mut self, b: u8, line: usize, col: usize) -> TinyResult<Token> {
        match b {
            b'0'..=b'9' => Ok(self.scan_number()),
            b'"' => self.scan_string(line, col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => Ok(self.scan_ident_or_keyword()),
            b'(' => {
                self.advance();
                Ok(Token::LParen)
            }
            b')' => {
                self.advance();
                Ok(Token::RParen)
            }
            b'{' => {
                self.advance();
                Ok(Token::LBrace)
            }
            b'}' => {
                self.advance();
                Ok(Token::RBrace)
            }
            b',' => {
                self.advance();
                Ok(Token::Comma)
            }
            b';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            b'+' => {
                self.advance();
                Ok(Token::Plus)
            }
            b'-' => {
                self.advance();
                Ok(Token::Minus)
            }
            b'*' => {
                self.advance();
                Ok(Token::Star)
            }
            b'/' => {
                self.advance();
                Ok(Token::Slash)
            }
            b'<' => {
                self.advance();
                match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        Ok(Token::LessEq)
                    }
                    Some(b'<') => {
                        self.advance();
                        Ok(Token::Shl)
                    }
                    _ => Ok(Token::Less),
                }
            }
            b'>' => {
                self.advance();
                match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        Ok(Token::GreaterEq)
                    }
                    Some(b'>') => {
                        self.advance();
                        Ok(Token::Shr)
                    }
                    _ => Ok(Token::Greater),
                }
            }
            b'=' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(Token::EqEq)
                } else {
                    Ok(Token::Assign)
                }
            }
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(lex_error(format!(
                        "unexpected '!' at line {line}, col {col} (no logical not operator)"
                    )))
                }
            }
            other => Err(lex_error(format!(
                "unexpected character '{}' at line {line}, col {col}",
                other as char
            ))),
        }
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
        let mut is_double = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_double = true;
            self.advance();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        if is_double {
            Token::DoubleLit(text.parse().unwrap_or(0.0))
        } else {
            Token::IntLit(text.parse().unwrap_or(0))
        }
    }

    fn scan_string(&mut self, line: usize, col: usize) -> TinyResult<Token> {
        self.advance(); // opening quote
        let mut bytes = Vec::new();
        loop {
            match self.advance() {
                Some(b'"') => return Ok(Token::StringLit(bytes)),
                Some(b'\\') => match self.advance() {
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b't') => bytes.push(b'\t'),
                    Some(b'"') => bytes.push(b'"'),
                    Some(b'\\') => bytes.push(b'\\'),
                    Some(other) => bytes.push(other),
                    None => {
                        return Err(lex_error(format!(
                            "unterminated string literal starting at line {line}, col {col}"
                        )))
                    }
                },
                Some(b) => bytes.push(b),
                None => {
                    return Err(lex_error(format!(
                        "unterminated string literal starting at line {line}, col {col}"
                    )))
                }
            }
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        match text {
            "int" => Token::KwInt,
            "double" => Token::KwDouble,
            "string" => Token::KwString,
            "bool" => Token::KwBool,
            "auto" => Token::KwAuto,
            "if" => Token::KwIf,
            "else" => Token::KwElse,
            "for" => Token::KwFor,
            "return" => Token::KwReturn,
            "cout" => Token::KwCout,
            "cin" => Token::KwCin,
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            other => Token::Ident(other.to_string()),
        }
    }
}
