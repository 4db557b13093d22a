//! Scanner (lexer) for expression source
//!
//! Converts characters into [`Token`]s one at a time, on demand. The parser
//! pulls a token whenever it consumes its lookahead; there is no separate
//! tokenization pass.
//!
//! Every multi-character token is resolved with exactly one character of
//! lookahead, so the scanner keeps a single pushback slot. Identifier and
//! keyword spellings go into a bounded text buffer that is reused across scans.

use std::fmt;
use std::iter::Fuse;
use std::str::Chars;

use thiserror::Error;
use tracing::trace;

/// Capacity of the identifier text buffer, counting one reserved slot.
/// Identifiers may therefore be at most `DEFAULT_TEXT_LIMIT - 1` characters.
pub const DEFAULT_TEXT_LIMIT: usize = 512;

/// All token kinds produced by the scanner.
///
/// Only integer literals carry a payload. The spelling of an identifier stays
/// in the scanner's text buffer (see [`Scanner::text`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    // End of input
    Eof,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Statement separator
    Semicolon, // ;

    // Literals and names
    IntLiteral(i32),
    Ident,

    // Assignment and comparison
    Assign, // =
    EqEq,   // ==
    NotEq,  // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=

    // Delimiters
    LBrace, // {
    RBrace, // }
    LParen, // (
    RParen, // )

    // Keywords
    Print,
    Int,
    If,
    Else,
    While,
    For,
    Void,
}

impl Token {
    /// Binding power of this token in operator position.
    ///
    /// `*` and `/` bind at 20, `+` and `-` at 10. Every other token returns 0,
    /// which the parser treats as "not a binary operator".
    pub fn precedence(self) -> u8 {
        match self {
            Token::Star | Token::Slash => 20,
            Token::Plus | Token::Minus => 10,
            _ => 0,
        }
    }

    /// True once the scanner has run out of input.
    pub fn is_eof(self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Token::Print
                | Token::Int
                | Token::If
                | Token::Else
                | Token::While
                | Token::For
                | Token::Void
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of file"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Semicolon => write!(f, "';'"),
            Token::IntLiteral(n) => write!(f, "int literal {}", n),
            Token::Ident => write!(f, "identifier"),
            Token::Assign => write!(f, "'='"),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Le => write!(f, "'<='"),
            Token::Gt => write!(f, "'>'"),
            Token::Ge => write!(f, "'>='"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Print => write!(f, "'print'"),
            Token::Int => write!(f, "'int'"),
            Token::If => write!(f, "'if'"),
            Token::Else => write!(f, "'else'"),
            Token::While => write!(f, "'while'"),
            Token::For => write!(f, "'for'"),
            Token::Void => write!(f, "'void'"),
        }
    }
}

/// A lexical error, tagged with the line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lexical error on line {line}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that starts no token.
    #[error("unrecognised character {0:?}")]
    UnrecognizedCharacter(char),

    /// A two-character operator whose second character is mandatory, i.e. `!`
    /// not followed by `=`.
    #[error("expected '=' after {first:?}, found {}", describe_char(.found))]
    MalformedOperator { first: char, found: Option<char> },

    /// An identifier that does not fit in the text buffer.
    #[error("identifier too long (at most {max_len} characters)")]
    IdentifierTooLong { max_len: usize },
}

fn describe_char(c: &Option<char>) -> String {
    match c {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

/// Keyword lookup. The first letter picks a short candidate list so most
/// identifiers are rejected without a string comparison.
fn keyword(text: &str) -> Option<Token> {
    let candidates: &[(&str, Token)] = match text.as_bytes().first()? {
        b'e' => &[("else", Token::Else)],
        b'f' => &[("for", Token::For)],
        b'i' => &[("int", Token::Int), ("if", Token::If)],
        b'p' => &[("print", Token::Print)],
        b'v' => &[("void", Token::Void)],
        b'w' => &[("while", Token::While)],
        _ => return None,
    };

    candidates
        .iter()
        .find(|(word, _)| *word == text)
        .map(|&(_, token)| token)
}

/// On-demand scanner over a character source.
///
/// One scanner serves one compilation run. It owns the only mutable scanning
/// state: the pushback slot, the line counter and the text buffer.
pub struct Scanner<I: Iterator<Item = char>> {
    input: Fuse<I>,
    putback: Option<char>,
    line: usize,
    text: String,
    text_limit: usize,
}

impl<'a> Scanner<Chars<'a>> {
    /// Create a scanner over a source string.
    pub fn new(source: &'a str) -> Self {
        Self::from_chars(source.chars())
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    /// Create a scanner over any character source.
    pub fn from_chars(input: I) -> Self {
        Self {
            input: input.fuse(),
            putback: None,
            line: 1,
            text: String::with_capacity(DEFAULT_TEXT_LIMIT),
            text_limit: DEFAULT_TEXT_LIMIT,
        }
    }

    /// Override the identifier buffer capacity (one slot is reserved, as with
    /// the default).
    pub fn with_text_limit(mut self, limit: usize) -> Self {
        self.text_limit = limit;
        self
    }

    /// Current line number, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Spelling of the most recent identifier or keyword.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Borrow the scanner as an iterator over its remaining tokens.
    pub fn tokens(&mut self) -> Tokens<'_, I> {
        Tokens {
            scanner: self,
            finished: false,
        }
    }

    /// Scan the next token.
    ///
    /// Returns [`Token::Eof`] when the input is exhausted, and keeps returning
    /// it on every later call.
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let Some(c) = self.skip_whitespace() else {
            trace!(line = self.line, "scanned end of input");
            return Ok(Token::Eof);
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            ';' => Token::Semicolon,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '=' => {
                if self.follows('=') {
                    Token::EqEq
                } else {
                    Token::Assign
                }
            }
            '!' => match self.next_char() {
                Some('=') => Token::NotEq,
                found => {
                    return Err(self.error(LexErrorKind::MalformedOperator {
                        first: '!',
                        found,
                    }));
                }
            },
            '<' => {
                if self.follows('=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.follows('=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '0'..='9' => Token::IntLiteral(self.scan_int(c)),
            'a'..='z' | 'A'..='Z' | '_' => {
                self.scan_identifier(c)?;
                keyword(&self.text).unwrap_or(Token::Ident)
            }
            _ => return Err(self.error(LexErrorKind::UnrecognizedCharacter(c))),
        };

        trace!(line = self.line, %token, "scanned token");
        Ok(token)
    }

    /// Accumulate decimal digits. Overflow wraps; there is no sign handling.
    fn scan_int(&mut self, first: char) -> i32 {
        let mut value: i32 = 0;
        let mut c = Some(first);

        while let Some(digit) = c.and_then(|ch| ch.to_digit(10)) {
            value = value.wrapping_mul(10).wrapping_add(digit as i32);
            c = self.next_char();
        }

        if let Some(ch) = c {
            self.putback(ch);
        }
        value
    }

    /// Read an identifier into the text buffer.
    fn scan_identifier(&mut self, first: char) -> Result<(), LexError> {
        self.text.clear();
        let mut c = Some(first);

        while let Some(ch) = c.filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_') {
            if self.text.len() + 1 >= self.text_limit {
                return Err(self.error(LexErrorKind::IdentifierTooLong {
                    max_len: self.text_limit.saturating_sub(1),
                }));
            }
            self.text.push(ch);
            c = self.next_char();
        }

        if let Some(ch) = c {
            self.putback(ch);
        }
        Ok(())
    }

    /// Consume the next character if it is `expected`, otherwise push it back.
    fn follows(&mut self, expected: char) -> bool {
        match self.next_char() {
            Some(c) if c == expected => true,
            Some(c) => {
                self.putback(c);
                false
            }
            None => false,
        }
    }

    /// Return the first non-whitespace character, counting newlines.
    fn skip_whitespace(&mut self) -> Option<char> {
        let mut c = self.next_char();
        while matches!(c, Some(' ' | '\t' | '\n' | '\r' | '\x0c')) {
            c = self.next_char();
        }
        c
    }

    /// Read one character, draining the pushback slot first.
    ///
    /// The line counter moves when a newline is first read from the source,
    /// not when it is consumed from the pushback slot. A newline read as
    /// lookahead and pushed back is still counted once, but it is counted
    /// early: an error on the token that ended just before it reports the
    /// following line.
    fn next_char(&mut self) -> Option<char> {
        if let Some(c) = self.putback.take() {
            return Some(c);
        }

        let c = self.input.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn putback(&mut self, c: char) {
        debug_assert!(self.putback.is_none(), "pushback slot already occupied");
        self.putback = Some(c);
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            line: self.line,
        }
    }
}

/// Iterator over a scanner's tokens, returned by [`Scanner::tokens`].
///
/// Stops before [`Token::Eof`], and after the first error.
pub struct Tokens<'s, I: Iterator<Item = char>> {
    scanner: &'s mut Scanner<I>,
    finished: bool,
}

impl<I: Iterator<Item = char>> Iterator for Tokens<'_, I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.scanner.scan() {
            Ok(Token::Eof) => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Scanner::new(source)
            .tokens()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn scan_error(source: &str) -> LexError {
        Scanner::new(source)
            .tokens()
            .find_map(Result::err)
            .expect("expected a lexical error")
    }

    #[test]
    fn test_single_char_tokens() {
        assert_eq!(
            tokens("+ - * / ; { } ( )"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Semicolon,
                Token::LBrace,
                Token::RBrace,
                Token::LParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            tokens("== = != <= < >= >"),
            vec![
                Token::EqEq,
                Token::Assign,
                Token::NotEq,
                Token::Le,
                Token::Lt,
                Token::Ge,
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_lookahead_is_pushed_back() {
        // The character after `<` or `=` must still be scanned as its own token.
        assert_eq!(
            tokens("<5=x>;"),
            vec![
                Token::Lt,
                Token::IntLiteral(5),
                Token::Assign,
                Token::Ident,
                Token::Gt,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_operator_at_end_of_input() {
        assert_eq!(tokens("<"), vec![Token::Lt]);
        assert_eq!(tokens("="), vec![Token::Assign]);
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(
            tokens("0 7 42 1234567;"),
            vec![
                Token::IntLiteral(0),
                Token::IntLiteral(7),
                Token::IntLiteral(42),
                Token::IntLiteral(1234567),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_integer_stops_at_non_digit() {
        assert_eq!(tokens("12abc"), vec![Token::IntLiteral(12), Token::Ident]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        assert_eq!(tokens("2147483648"), vec![Token::IntLiteral(i32::MIN)]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("print int if else while for void"),
            vec![
                Token::Print,
                Token::Int,
                Token::If,
                Token::Else,
                Token::While,
                Token::For,
                Token::Void,
            ]
        );
    }

    #[test]
    fn test_keyword_lookalikes_are_identifiers() {
        for word in ["Print", "INT", "iff", "els", "whiles", "fo", "_void", "p", "x1"] {
            let mut scanner = Scanner::new(word);
            assert_eq!(scanner.scan().unwrap(), Token::Ident, "{word}");
            assert_eq!(scanner.text(), word);
        }
    }

    #[test]
    fn test_identifier_text_buffer_is_reused() {
        let mut scanner = Scanner::new("alpha b_2 while");
        assert_eq!(scanner.scan().unwrap(), Token::Ident);
        assert_eq!(scanner.text(), "alpha");
        assert_eq!(scanner.scan().unwrap(), Token::Ident);
        assert_eq!(scanner.text(), "b_2");
        assert_eq!(scanner.scan().unwrap(), Token::While);
        assert_eq!(scanner.text(), "while");
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut scanner = Scanner::new("  \n");
        assert!(scanner.scan().unwrap().is_eof());
        assert!(scanner.scan().unwrap().is_eof());
        assert_eq!(scanner.line(), 2);
    }

    #[test]
    fn test_line_counting() {
        let mut scanner = Scanner::new("1\n\n2\r\n\t3");
        assert_eq!(scanner.scan().unwrap(), Token::IntLiteral(1));
        assert_eq!(scanner.scan().unwrap(), Token::IntLiteral(2));
        assert_eq!(scanner.line(), 3);
        assert_eq!(scanner.scan().unwrap(), Token::IntLiteral(3));
        assert_eq!(scanner.line(), 4);
    }

    #[test]
    fn test_pushed_back_newline_counted_once() {
        // The newline after `5` is read as lookahead, pushed back, then
        // re-read by the whitespace skipper.
        let err = scan_error("5\n!");
        assert_eq!(err.line, 2);
        assert_eq!(
            err.kind,
            LexErrorKind::MalformedOperator {
                first: '!',
                found: None
            }
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let err = scan_error("1 +\n\n @");
        assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter('@'));
        assert_eq!(err.line, 3);
        assert_eq!(
            err.to_string(),
            "lexical error on line 3: unrecognised character '@'"
        );
    }

    #[test]
    fn test_bang_without_equals() {
        let err = scan_error("1 !x");
        assert_eq!(
            err.kind,
            LexErrorKind::MalformedOperator {
                first: '!',
                found: Some('x')
            }
        );
        assert_eq!(
            err.to_string(),
            "lexical error on line 1: expected '=' after '!', found 'x'"
        );
    }

    #[test]
    fn test_identifier_too_long() {
        let source = format!("\n\n{}", "a".repeat(DEFAULT_TEXT_LIMIT));
        let err = scan_error(&source);
        assert_eq!(
            err.kind,
            LexErrorKind::IdentifierTooLong {
                max_len: DEFAULT_TEXT_LIMIT - 1
            }
        );
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_identifier_at_limit() {
        let name = "z".repeat(DEFAULT_TEXT_LIMIT - 1);
        let mut scanner = Scanner::new(&name);
        assert_eq!(scanner.scan().unwrap(), Token::Ident);
        assert_eq!(scanner.text().len(), DEFAULT_TEXT_LIMIT - 1);
    }

    #[test]
    fn test_custom_text_limit() {
        let mut scanner = Scanner::new("abcd").with_text_limit(4);
        assert_eq!(
            scanner.scan().unwrap_err().kind,
            LexErrorKind::IdentifierTooLong { max_len: 3 }
        );

        let mut scanner = Scanner::new("abc").with_text_limit(4);
        assert_eq!(scanner.scan().unwrap(), Token::Ident);
    }

    #[test]
    fn test_tokens_stop_after_error() {
        let results: Vec<_> = Scanner::new("1 $ 2").tokens().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_tokens_leave_scanner_usable() {
        let mut scanner = Scanner::new("a b");
        assert_eq!(scanner.tokens().next(), Some(Ok(Token::Ident)));
        assert_eq!(scanner.text(), "a");
        assert_eq!(scanner.scan().unwrap(), Token::Ident);
        assert_eq!(scanner.text(), "b");
    }

    #[test]
    fn test_scan_on_owned_scanner() {
        // `scan` is called on a plain value here, as the parser does.
        let mut scanner = Scanner::from_chars("7;".chars());
        let first = scanner.scan();
        assert_eq!(first, Ok(Token::IntLiteral(7)));
        assert_eq!(scanner.scan(), Ok(Token::Semicolon));
        assert_eq!(scanner.scan(), Ok(Token::Eof));
    }

    #[test]
    fn test_from_chars() {
        let source = vec!['9', '*', '3'];
        let scanned: Vec<_> = Scanner::from_chars(source.into_iter())
            .tokens()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            scanned,
            vec![Token::IntLiteral(9), Token::Star, Token::IntLiteral(3)]
        );
    }

    #[test]
    fn test_precedence_table() {
        assert_eq!(Token::Star.precedence(), 20);
        assert_eq!(Token::Slash.precedence(), 20);
        assert_eq!(Token::Plus.precedence(), 10);
        assert_eq!(Token::Minus.precedence(), 10);
        assert_eq!(Token::Semicolon.precedence(), 0);
        assert_eq!(Token::IntLiteral(3).precedence(), 0);
        assert_eq!(Token::EqEq.precedence(), 0);
        assert_eq!(Token::Eof.precedence(), 0);
    }
}
