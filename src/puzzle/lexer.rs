//! The ZBC lexer.
//!
//! Tokenises one source line at a time; the format is line-oriented, so
//! newlines never appear inside a clue. Every token carries its 1-based
//! line and column for error reporting.
//!
//! A `#` immediately followed by a digit is a position literal (`#3`);
//! any other `#` starts a comment running to the end of the line.

use crate::error::{Result, SolverError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier-shaped word: `ana`, `color.red`, `age.20`, `in`,
    /// `diff`, `truths`.
    Word(String),
    Number(i64),
    /// A position literal, kept in its surface form: `#3`.
    Position(String),
    Dollar,
    Underscore,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Star,
    Plus,
    Slash,
    Percent,
    Bang,
    Amp,
    Pipe,
    Caret,
    /// `<=>`
    Iff,
    /// `=>`
    Implies,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Minus,
    MinusMinus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

fn parse_error(message: impl Into<String>, line: u32, column: u32) -> crate::error::Error {
    SolverError::Parse {
        message: message.into(),
        line,
        column,
    }
    .into()
}

/// Tokenises one line. Returns an empty vector for blank and comment-only
/// lines.
pub fn tokenize_line(line: &str, line_no: u32) -> Result<Vec<Token>> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let column = i as u32 + 1;
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            '#' => {
                if chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()) {
                    let start = i;
                    i += 1;
                    while chars.get(i).is_some_and(|d| d.is_ascii_digit()) {
                        i += 1;
                    }
                    let text: String = chars[start..i].iter().collect();
                    tokens.push(Token {
                        kind: TokenKind::Position(text),
                        line: line_no,
                        column,
                    });
                    continue;
                }
                // Comment to end of line.
                break;
            }
            '$' => {
                i += 1;
                TokenKind::Dollar
            }
            '_' => {
                i += 1;
                TokenKind::Underscore
            }
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            '[' => {
                i += 1;
                TokenKind::LBracket
            }
            ']' => {
                i += 1;
                TokenKind::RBracket
            }
            ',' => {
                i += 1;
                TokenKind::Comma
            }
            ':' => {
                i += 1;
                TokenKind::Colon
            }
            '*' => {
                i += 1;
                TokenKind::Star
            }
            '+' => {
                i += 1;
                TokenKind::Plus
            }
            '/' => {
                i += 1;
                TokenKind::Slash
            }
            '%' => {
                i += 1;
                TokenKind::Percent
            }
            '^' => {
                i += 1;
                TokenKind::Caret
            }
            '&' => {
                i += 1;
                TokenKind::Amp
            }
            '|' => {
                i += 1;
                TokenKind::Pipe
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 2;
                    TokenKind::NotEq
                } else {
                    i += 1;
                    TokenKind::Bang
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    if chars.get(i + 2) == Some(&'>') {
                        i += 3;
                        TokenKind::Iff
                    } else {
                        i += 2;
                        TokenKind::Le
                    }
                } else {
                    i += 1;
                    TokenKind::Lt
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 2;
                    TokenKind::Ge
                } else {
                    i += 1;
                    TokenKind::Gt
                }
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 2;
                    TokenKind::EqEq
                } else if chars.get(i + 1) == Some(&'>') {
                    i += 2;
                    TokenKind::Implies
                } else {
                    i += 1;
                    TokenKind::Eq
                }
            }
            '-' => {
                if chars.get(i + 1) == Some(&'-') {
                    i += 2;
                    TokenKind::MinusMinus
                } else {
                    i += 1;
                    TokenKind::Minus
                }
            }
            d if d.is_ascii_digit() => {
                let start = i;
                while chars.get(i).is_some_and(|d| d.is_ascii_digit()) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse()
                    .map_err(|_| parse_error(format!("number `{text}` out of range"), line_no, column))?;
                TokenKind::Number(value)
            }
            a if a.is_alphabetic() => {
                let start = i;
                while chars
                    .get(i)
                    .is_some_and(|w| w.is_alphanumeric() || *w == '_' || *w == '.')
                {
                    i += 1;
                }
                TokenKind::Word(chars[start..i].iter().collect())
            }
            other => {
                return Err(parse_error(
                    format!("unexpected character `{other}`"),
                    line_no,
                    column,
                ));
            }
        };

        tokens.push(Token {
            kind,
            line: line_no,
            column,
        });
    }

    Ok(tokens)
}
