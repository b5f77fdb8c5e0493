//! Hand-rolled lexer for the obfuscated-script subset (spec.md §3/§9).
//!
//! Covers the token kinds the deobfuscation passes need to see: keywords,
//! identifiers, numbers (decimal and hex), single- and double-quoted
//! strings with escapes, and the operator/punctuator set used by the
//! patterns in `deob`. Constructs outside the subset (template literals,
//! regex literals, `new`) are tokenized as [`Token::Unsupported`] so the
//! parser can fail that one production with `AstError::Unsupported`
//! instead of panicking partway through a file.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Number(f64),
    String(String),
    Keyword(Keyword),
    Punct(&'static str),
    Unsupported(char),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Var,
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    For,
    In,
    While,
    Do,
    Try,
    Catch,
    Finally,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    True,
    False,
    TypeOf,
    Void,
    Delete,
}

impl Keyword {
    fn from_str(s: &str) -> Option<Keyword> {
        Some(match s {
            "var" => Keyword::Var,
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "function" => Keyword::Function,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "for" => Keyword::For,
            "in" => Keyword::In,
            "while" => Keyword::While,
            "do" => Keyword::Do,
            "try" => Keyword::Try,
            "catch" => Keyword::Catch,
            "finally" => Keyword::Finally,
            "switch" => Keyword::Switch,
            "case" => Keyword::Case,
            "default" => Keyword::Default,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "typeof" => Keyword::TypeOf,
            "void" => Keyword::Void,
            "delete" => Keyword::Delete,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub pos: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lex error at byte {}: {}", self.pos, self.message)
    }
}

impl std::error::Error for LexError {}

/// Longest-match-first so e.g. `===` is not lexed as `==` followed by `=`.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", ">>>", "<<=", ">>=", "&&=", "||=", "??=", "...", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "<<", ">>", "**", "(", ")", "{", "}", "[", "]", ";", ",", ".", "?", ":", "=", "+", "-",
    "*", "/", "%", "<", ">", "!", "~", "&", "|", "^",
];

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(src: &'a str) -> Result<Vec<SpannedToken>, LexError> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.token == Token::Eof;
            out.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(out)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.pos += 2;
                    while self.peek().is_some() {
                        if self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_trivia();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                pos: start,
            });
        };

        if c.is_ascii_digit() || (c == b'.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()))
        {
            return self.read_number(start);
        }
        if c == b'"' || c == b'\'' {
            return self.read_string(c, start);
        }
        if is_ident_start(c) {
            return self.read_ident(start);
        }
        for punct in PUNCTUATORS {
            if self.src[self.pos..].starts_with(punct.as_bytes()) {
                self.pos += punct.len();
                return Ok(SpannedToken {
                    token: Token::Punct(punct),
                    pos: start,
                });
            }
        }
        // Backtick template literals, regex literals and anything else
        // outside the subset fall through here.
        self.pos += 1;
        Ok(SpannedToken {
            token: Token::Unsupported(c as char),
            pos: start,
        })
    }

    fn read_number(&mut self, start: usize) -> Result<SpannedToken, LexError> {
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            let hex_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.src[hex_start..self.pos]).unwrap();
            let value = i64::from_str_radix(text, 16).map_err(|e| LexError {
                message: format!("invalid hex literal: {e}"),
                pos: start,
            })? as f64;
            return Ok(SpannedToken {
                token: Token::Number(value),
                pos: start,
            });
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        let value = text.parse::<f64>().map_err(|e| LexError {
            message: format!("invalid number literal {text:?}: {e}"),
            pos: start,
        })?;
        Ok(SpannedToken {
            token: Token::Number(value),
            pos: start,
        })
    }

    fn read_string(&mut self, quote: u8, start: usize) -> Result<SpannedToken, LexError> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        pos: start,
                    });
                }
                Some(c) if c == quote => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => out.push('\n'),
                    Some(b't') => out.push('\t'),
                    Some(b'r') => out.push('\r'),
                    Some(b'\\') => out.push('\\'),
                    Some(b'\'') => out.push('\''),
                    Some(b'"') => out.push('"'),
                    Some(b'0') => out.push('\0'),
                    Some(b'b') => out.push('\u{8}'),
                    Some(b'f') => out.push('\u{c}'),
                    Some(b'v') => out.push('\u{b}'),
                    Some(b'\n') => {}
                    Some(b'x') => {
                        let hex: String = (0..2)
                            .filter_map(|_| self.bump().map(|b| b as char))
                            .collect();
                        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
                        if let Some(ch) = char::from_u32(code) {
                            out.push(ch);
                        }
                    }
                    Some(b'u') => {
                        let hex: String = if self.peek() == Some(b'{') {
                            self.bump();
                            let mut s = String::new();
                            while let Some(b) = self.peek() {
                                if b == b'}' {
                                    self.bump();
                                    break;
                                }
                                s.push(self.bump().unwrap() as char);
                            }
                            s
                        } else {
                            (0..4).filter_map(|_| self.bump().map(|b| b as char)).collect()
                        };
                        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
                        if let Some(ch) = char::from_u32(code) {
                            out.push(ch);
                        }
                    }
                    Some(other) => out.push(other as char),
                    None => {
                        return Err(LexError {
                            message: "unterminated escape sequence".to_string(),
                            pos: start,
                        });
                    }
                },
                Some(c) => {
                    // Re-decode as UTF-8: fall back to byte-at-a-time for
                    // ASCII, which covers everything this protocol emits.
                    out.push(c as char);
                }
            }
        }
        Ok(SpannedToken {
            token: Token::String(out),
            pos: start,
        })
    }

    fn read_ident(&mut self, start: usize) -> Result<SpannedToken, LexError> {
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        let token = match Keyword::from_str(text) {
            Some(kw) => Token::Keyword(kw),
            None if text == "true" => Token::Keyword(Keyword::True),
            None if text == "false" => Token::Keyword(Keyword::False),
            None => Token::Identifier(text.to_string()),
        };
        Ok(SpannedToken { token, pos: start })
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_numbers_and_strings() {
        let tokens = Lexer::tokenize(r#"var x = 10.5, y = "hi\n";"#).unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(t.token, Token::Number(n) if (n - 10.5).abs() < f64::EPSILON)));
        assert!(tokens
            .iter()
            .any(|t| matches!(&t.token, Token::String(s) if s == "hi\n")));
    }

    #[test]
    fn longest_match_wins_for_punctuators() {
        let tokens = Lexer::tokenize("a === b").unwrap();
        assert!(tokens.iter().any(|t| t.token == Token::Punct("===")));
    }

    #[test]
    fn hex_literal_decodes() {
        let tokens = Lexer::tokenize("0x1A").unwrap();
        assert_eq!(tokens[0].token, Token::Number(26.0));
    }
}
