//! Master-file tokenizer.
//!
//! Produces logical lines: comments are removed, parenthesised groups are
//! joined across physical lines, and quoted strings become single tokens.

use crate::error::{NormalizeError, NormalizeResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Token {
    Word(String),
    Quoted(String),
}

impl Token {
    pub(super) fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::Quoted(_) => None,
        }
    }

    /// The token as it appears in canonical rdata.
    pub(super) fn to_text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => format!("\"{q}\""),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Line {
    /// 1-based physical line the logical line starts on.
    pub(super) number: usize,
    /// The line began with whitespace, so the owner is inherited.
    pub(super) inherits_owner: bool,
    pub(super) tokens: Vec<Token>,
}

pub(super) fn tokenize(input: &str) -> NormalizeResult<Vec<Line>> {
    let mut lines = Vec::new();
    let mut chars = input.chars().peekable();
    let mut physical = 1usize;
    let mut depth = 0usize;
    let mut word = String::new();
    let mut current: Option<Line> = None;
    let mut at_line_start = true;

    fn flush(word: &mut String, line: &mut Option<Line>) {
        if !word.is_empty() {
            if let Some(line) = line.as_mut() {
                line.tokens.push(Token::Word(std::mem::take(word)));
            }
        }
    }

    while let Some(c) = chars.next() {
        if at_line_start && depth == 0 {
            current = Some(Line {
                number: physical,
                inherits_owner: c == ' ' || c == '\t',
                tokens: Vec::new(),
            });
        }
        at_line_start = false;

        match c {
            '\n' => {
                flush(&mut word, &mut current);
                physical += 1;
                if depth == 0 {
                    if let Some(line) = current.take().filter(|l| !l.tokens.is_empty()) {
                        lines.push(line);
                    }
                }
                at_line_start = true;
            }
            ';' => {
                flush(&mut word, &mut current);
                while chars.peek().is_some_and(|n| *n != '\n') {
                    chars.next();
                }
            }
            '"' => {
                flush(&mut word, &mut current);
                let mut text = String::new();
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '\\' => {
                            text.push(q);
                            if let Some(escaped) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\n' => {
                            return Err(NormalizeError::syntax(physical, "newline in quoted string"));
                        }
                        _ => text.push(q),
                    }
                }
                if !closed {
                    return Err(NormalizeError::syntax(physical, "unterminated quoted string"));
                }
                if let Some(line) = current.as_mut() {
                    line.tokens.push(Token::Quoted(text));
                }
            }
            '(' => {
                flush(&mut word, &mut current);
                depth += 1;
            }
            ')' => {
                flush(&mut word, &mut current);
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| NormalizeError::syntax(physical, "unbalanced ')'"))?;
            }
            '\\' => {
                word.push(c);
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
            }
            c if c.is_whitespace() => flush(&mut word, &mut current),
            c => word.push(c),
        }
    }

    if depth > 0 {
        return Err(NormalizeError::syntax(physical, "unbalanced '('"));
    }
    flush(&mut word, &mut current);
    if let Some(line) = current.filter(|l| !l.tokens.is_empty()) {
        lines.push(line);
    }
    Ok(lines)
}
