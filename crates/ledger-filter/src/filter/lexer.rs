//! Lexer (tokenizer) for filter expressions.
//!
//! The lexer never fails: an unterminated quote runs to the end of the input
//! and any punctuation it does not know is simply part of a word.

/// A token with its span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
    /// The byte position just past the end of the token.
    pub end: usize,
}

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    // ==================== Operators ====================
    /// The `AND` keyword.
    And,

    /// The `OR` keyword.
    Or,

    /// The `NOT` keyword.
    Not,

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    // ==================== Field syntax ====================
    /// The `:` between a field key and its value.
    Colon,

    /// The `..` between the bounds of a range.
    RangeDots,

    // ==================== Terms ====================
    /// A bare word.
    Word(String),

    /// A double-quoted string, with escapes resolved.
    Quoted(String),
}

impl FilterToken {
    /// The token as it would be written back out, for error messages.
    pub fn describe(&self) -> String {
        match self {
            FilterToken::And => "AND".to_string(),
            FilterToken::Or => "OR".to_string(),
            FilterToken::Not => "NOT".to_string(),
            FilterToken::OpenParen => "(".to_string(),
            FilterToken::CloseParen => ")".to_string(),
            FilterToken::Colon => ":".to_string(),
            FilterToken::RangeDots => "..".to_string(),
            FilterToken::Word(word) => word.clone(),
            FilterToken::Quoted(text) => format!("\"{text}\""),
        }
    }
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    /// Set right after a `:` or `..` and cleared by whitespace. Inside a value
    /// colons are ordinary characters, `..` splits a range, and keywords are
    /// plain words.
    in_value: bool,
    /// End of the last bare word outside a value. A `:` is only a field
    /// separator when it starts exactly here.
    word_end: Option<usize>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            in_value: false,
            word_end: None,
        }
    }

    /// The unconsumed part of the input.
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters. Returns true if any were skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
        self.position > start
    }

    /// Returns true if `c` ends a bare word in the current context.
    fn ends_word(&self, c: char) -> bool {
        if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
            return true;
        }
        if self.in_value {
            c == '.' && self.rest().starts_with("..")
        } else {
            c == ':'
        }
    }

    /// Reads a bare word.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if self.ends_word(c) {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Reads a colon that is not attached to a key, along with the rest of
    /// its word, so `cat :Food` keeps `:Food` together as one term.
    fn read_detached_colon(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Reads a double-quoted string, resolving backslash escapes.
    ///
    /// A missing closing quote is not an error; the string runs to the end of
    /// the input.
    fn read_quoted_string(&mut self) -> String {
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            match c {
                '"' => break,
                '\\' => {
                    if let Some(escaped) = self.next_char() {
                        result.push(escaped);
                    }
                }
                _ => result.push(c),
            }
        }
        result
    }

    /// Returns the next token with its span, or None if at end of input.
    pub fn next_token(&mut self) -> Option<PositionedToken> {
        if self.skip_whitespace() {
            self.in_value = false;
        }

        let c = self.peek()?;
        let start = self.position;

        let token = match c {
            '(' => {
                self.next_char();
                self.in_value = false;
                FilterToken::OpenParen
            }
            ')' => {
                self.next_char();
                self.in_value = false;
                FilterToken::CloseParen
            }
            '"' => FilterToken::Quoted(self.read_quoted_string()),
            ':' if !self.in_value && self.word_end == Some(start) => {
                self.next_char();
                self.in_value = true;
                FilterToken::Colon
            }
            ':' if !self.in_value => FilterToken::Word(self.read_detached_colon()),
            '.' if self.in_value && self.rest().starts_with("..") => {
                self.position += 2;
                FilterToken::RangeDots
            }
            _ => {
                let word = self.read_word();
                if self.in_value {
                    FilterToken::Word(word)
                } else {
                    self.word_end = Some(self.position);
                    // A word directly before a colon is a field key, never a keyword
                    if self.peek() == Some(':') {
                        FilterToken::Word(word)
                    } else {
                        Self::keyword(&word).unwrap_or(FilterToken::Word(word))
                    }
                }
            }
        };

        Some(PositionedToken {
            token,
            position: start,
            end: self.position,
        })
    }

    /// Recognizes the boolean keywords, ignoring case.
    fn keyword(word: &str) -> Option<FilterToken> {
        if word.eq_ignore_ascii_case("and") {
            Some(FilterToken::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(FilterToken::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(FilterToken::Not)
        } else {
            None
        }
    }

    /// Collects all tokens into a vector.
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token() {
            tokens.push(positioned_token);
        }
        tokens
    }
}

/// Returns true if `word` would lex as one of the boolean keywords.
pub(crate) fn is_keyword(word: &str) -> bool {
    Lexer::keyword(word).is_some()
}
