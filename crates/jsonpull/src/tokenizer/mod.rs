//! The pull tokenizer.
//!
//! Overview
//! - JSON's grammar is recursive, but the tokenizer never recurses. Instead it
//!   keeps an explicit stack of [`Expect`] entries describing what the next
//!   call to [`Tokenizer::next`] has to produce. Every call pops one entry and
//!   may push the entries that follow from it, so memory is bounded by the
//!   nesting depth of the document rather than by the native call stack.
//! - The stack starts as `[Value]`. Opening a container pushes the entry that
//!   reads its first member; each member re-pushes the entry for the one after
//!   it; the closing bracket pushes nothing. When the stack runs empty the
//!   document is complete and every further call yields `Eof`.
//! - A fault pushes [`Expect::Error`], which re-pushes itself whenever it is
//!   popped. Failure is therefore an ordinary stack state: no flag is checked
//!   on the happy path, and the cursor stays on the fault forever.
//!
//! Borrowing
//! - The tokenizer holds the only (mutable) borrow of the input. Tokens carry
//!   spans, not references, so they can be held across calls to `next`.
//! - String decoding rewrites the bytes under a token. [`Tokenizer::parse_string`]
//!   consumes the token and returns a slice that borrows the tokenizer, so a
//!   literal cannot be decoded twice and cannot be read while the tokenizer
//!   advances.

use alloc::{borrow::Cow, vec::Vec};

use bstr::{BStr, ByteSlice};

use crate::{
    context::Context,
    error::{DecodeError, ParseError, SyntaxError},
    escape,
    options::TokenizerOptions,
    token::{Span, Token, TokenKind, classify_number},
};


/// What the next call to [`Tokenizer::next`] has to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// The single top-level value.
    Value,
    /// A member key or `}`. `first` until a member has been read.
    ObjectKey { first: bool },
    /// `:` followed by a member value.
    ObjectValue,
    /// An element or `]`. `first` until an element has been read.
    ArrayValue { first: bool },
    /// Terminal: re-pushed every time it is popped.
    Error,
}

/// A pull-based tokenizer over one complete, mutable document.
///
/// Each call to [`next`](Self::next) returns exactly one [`Token`]. For a
/// well-formed document every `Array`/`Object` token is matched by an
/// `EndArray`/`EndObject` after all of its children, and the stream ends with
/// `Eof`, repeated on further calls. A malformed document yields `Error` at
/// the first fault and on every call after it.
///
/// # Examples
///
/// ```rust
/// use jsonpull::{TokenKind, Tokenizer};
///
/// let mut input = b"[1, -2, 3.5]".to_vec();
/// let mut tokenizer = Tokenizer::new(&mut input);
///
/// let array = tokenizer.next();
/// assert_eq!(array.kind(), TokenKind::Array);
///
/// let mut sum = 0.0;
/// while let Some(element) = tokenizer.next_item().unwrap() {
///     sum += tokenizer.parse_float(&element).unwrap();
/// }
/// assert_eq!(sum, 2.5);
/// assert_eq!(tokenizer.next().kind(), TokenKind::Eof);
/// ```
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a mut [u8],
    cursor: usize,
    expect: Vec<Expect>,
    options: TokenizerOptions,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `input` with default options.
    #[must_use]
    pub fn new(input: &'a mut [u8]) -> Self {
        Self::with_options(input, TokenizerOptions::default())
    }

    /// Creates a tokenizer over `input`.
    #[must_use]
    pub fn with_options(input: &'a mut [u8], options: TokenizerOptions) -> Self {
        let mut expect = Vec::with_capacity(options.stack_capacity);
        expect.push(Expect::Value);
        Self {
            input,
            cursor: 0,
            expect,
            options,
        }
    }

    /// The document, including any strings decoded so far.
    #[must_use]
    pub fn input(&self) -> &BStr {
        self.input.as_bstr()
    }

    /// The raw bytes under `token`, still escaped for strings.
    ///
    /// Error tokens have no text and yield an empty slice. After
    /// [`parse_string`](Self::parse_string) the bytes under a string token are
    /// stale.
    #[must_use]
    pub fn text(&self, token: &Token) -> &BStr {
        let span = token.span().unwrap_or_default();
        self.input[span.range()].as_bstr()
    }

    /// The line around `offset`, for diagnostics.
    #[must_use]
    pub fn context(&self, offset: usize) -> Context<'_> {
        Context::resolve(&self.input[..], offset)
    }

    /// Resolves a fault to a line and column in this document.
    #[must_use]
    pub fn locate(&self, error: SyntaxError) -> ParseError {
        error.locate(&self.input[..])
    }

    /// Produces the next token.
    ///
    /// Once the top-level value is complete this returns `Eof` forever,
    /// spanning whatever input follows the value (see
    /// [`TokenizerOptions::reject_trailing`]); once a fault has been reported
    /// it returns `Error` forever, always at the offset of the first fault.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        let Some(expect) = self.expect.pop() else {
            return self.on_end();
        };
        match expect {
            Expect::Value => self.on_value(),
            Expect::ObjectKey { first } => self.on_object_key(first),
            Expect::ObjectValue => self.on_object_value(),
            Expect::ArrayValue { first } => self.on_array_value(first),
            Expect::Error => {
                self.expect.push(Expect::Error);
                Token::error(SyntaxError {
                    offset: self.cursor,
                    message: "Abort after previous error",
                })
            }
        }
    }

    /// Produces the next child of the current container.
    ///
    /// Returns `Ok(Some(token))` for values and keys, `Ok(None)` once the
    /// container closes (or the document ends).
    ///
    /// # Errors
    ///
    /// Returns the fault if the tokenizer produced an error token.
    pub fn next_item(&mut self) -> Result<Option<Token>, SyntaxError> {
        let token = self.next().into_result()?;
        Ok(token.is_item().then_some(token))
    }

    /// Consumes the children of a container token up to and including its
    /// closing token. Scalar tokens need no skipping and return immediately.
    ///
    /// Pass the token that was just returned by [`next`](Self::next); it is
    /// only inspected, not decoded.
    ///
    /// # Errors
    ///
    /// Returns the fault if `token` is an error token or a fault occurs
    /// inside the skipped value.
    pub fn skip(&mut self, token: &Token) -> Result<(), SyntaxError> {
        if let Some(error) = token.syntax_error() {
            return Err(error);
        }
        if !matches!(token.kind(), TokenKind::Array | TokenKind::Object) {
            return Ok(());
        }

        let mut depth = 1usize;
        while depth > 0 {
            match self.next().into_result()?.kind() {
                TokenKind::Array | TokenKind::Object => depth += 1,
                TokenKind::EndArray | TokenKind::EndObject => depth -= 1,
                TokenKind::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    /// Decodes a string token in place and returns the decoded bytes.
    ///
    /// The token is consumed: the bytes under it are rewritten, and decoding
    /// them again would corrupt them. The decoded text may not be valid
    /// UTF-8 if the literal contains unpaired `\u` surrogate escapes; see
    /// [`parse_str`](Self::parse_str).
    ///
    /// # Panics
    ///
    /// Panics if `token` is not a [`TokenKind::String`] token.
    #[track_caller]
    pub fn parse_string(&mut self, token: Token) -> &BStr {
        let span = span_of(&token, |kind| kind == TokenKind::String, "parse_string");
        let len = escape::unescape_in_place(&mut self.input[span.range()]);
        trace_event!(
            offset = span.start,
            raw_len = span.len,
            decoded_len = len,
            "decoded string in place"
        );
        self.input[span.start..span.start + len].as_bstr()
    }

    /// Decodes a string token in place and checks that it is UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidUtf8`] if the decoded bytes are not
    /// UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not a [`TokenKind::String`] token.
    #[track_caller]
    pub fn parse_str(&mut self, token: Token) -> Result<&str, DecodeError> {
        self.parse_string(token)
            .to_str()
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Decodes a string token without modifying the document.
    ///
    /// Borrows the document when the literal contains no escapes.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not a [`TokenKind::String`] token.
    #[must_use]
    #[track_caller]
    pub fn string_copied(&self, token: &Token) -> Cow<'_, BStr> {
        let span = span_of(token, |kind| kind == TokenKind::String, "string_copied");
        escape::unescape(&self.input[span.range()])
    }

    /// Decodes an `Int` or `UInt` token.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::IntegerOutOfRange`] if the literal does not fit
    /// in an `i64`.
    ///
    /// # Panics
    ///
    /// Panics if `token` is neither `Int` nor `UInt`.
    #[track_caller]
    pub fn parse_int(&self, token: &Token) -> Result<i64, DecodeError> {
        let text = self.number_text(
            token,
            |kind| matches!(kind, TokenKind::Int | TokenKind::UInt),
            "parse_int",
        )?;
        text.parse()
            .map_err(|_| DecodeError::IntegerOutOfRange { target: "i64" })
    }

    /// Decodes a `UInt` token.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::IntegerOutOfRange`] if the literal does not fit
    /// in a `u64`.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not `UInt`.
    #[track_caller]
    pub fn parse_uint(&self, token: &Token) -> Result<u64, DecodeError> {
        let text = self.number_text(token, |kind| kind == TokenKind::UInt, "parse_uint")?;
        text.parse()
            .map_err(|_| DecodeError::IntegerOutOfRange { target: "u64" })
    }

    /// Decodes any numeric token as a float. Literals beyond the range of
    /// `f64` become infinities.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidNumber`] if the literal cannot be
    /// converted.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not `Int`, `UInt` or `Float`.
    #[track_caller]
    pub fn parse_float(&self, token: &Token) -> Result<f64, DecodeError> {
        let text = self.number_text(token, TokenKind::is_number, "parse_float")?;
        text.parse().map_err(|_| DecodeError::InvalidNumber)
    }

    /// Decodes a `Bool` token.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not `Bool`.
    #[must_use]
    #[track_caller]
    pub fn parse_bool(&self, token: &Token) -> bool {
        let span = span_of(token, |kind| kind == TokenKind::Bool, "parse_bool");
        self.input[span.range()] == *b"true"
    }

    #[track_caller]
    fn number_text(
        &self,
        token: &Token,
        accepts: impl Fn(TokenKind) -> bool,
        operation: &str,
    ) -> Result<&str, DecodeError> {
        let span = span_of(token, accepts, operation);
        // Number spans are ASCII by construction.
        self.input[span.range()]
            .to_str()
            .map_err(|_| DecodeError::InvalidNumber)
    }

    // --------------------------------------------------------------------------------------------
    // Dispatch
    // --------------------------------------------------------------------------------------------

    fn on_end(&mut self) -> Token {
        if self.options.reject_trailing {
            self.skip_whitespace();
            if self.cursor < self.input.len() {
                return self.fail("Unexpected trailing characters");
            }
        }
        Token::new(
            TokenKind::Eof,
            Span::new(self.cursor, self.input.len() - self.cursor),
        )
    }

    fn on_value(&mut self) -> Token {
        self.skip_whitespace();
        match self.peek() {
            None => self.fail("Expected value"),
            Some(b'"') => self.string_token(),
            Some(b'{') => self.open(TokenKind::Object, Expect::ObjectKey { first: true }),
            Some(b'[') => self.open(TokenKind::Array, Expect::ArrayValue { first: true }),
            Some(_) => self.bareword_token(),
        }
    }

    fn on_object_key(&mut self, first: bool) -> Token {
        self.skip_whitespace();
        match self.peek() {
            None => return self.fail("Unterminated object"),
            Some(b'}') => return self.single(TokenKind::EndObject),
            Some(_) => {}
        }
        if let Err(message) = self.separator(first, "Expected ',' or '}'") {
            return self.fail(message);
        }

        self.expect.push(Expect::ObjectValue);

        self.skip_whitespace();
        if self.peek() != Some(b'"') {
            return self.fail("Expected object key");
        }
        self.string_token()
    }

    fn on_object_value(&mut self) -> Token {
        self.skip_whitespace();
        match self.peek() {
            None => return self.fail("Unterminated object"),
            Some(b':') => self.cursor += 1,
            Some(_) => return self.fail("Expected ':' after object key"),
        }

        // After this value: another key or the closing brace.
        self.expect.push(Expect::ObjectKey { first: false });
        self.on_value()
    }

    fn on_array_value(&mut self, first: bool) -> Token {
        self.skip_whitespace();
        match self.peek() {
            None => return self.fail("Unterminated array"),
            Some(b']') => return self.single(TokenKind::EndArray),
            Some(_) => {}
        }
        if let Err(message) = self.separator(first, "Expected ',' or ']'") {
            return self.fail(message);
        }

        // After this value: another element or the closing bracket.
        self.expect.push(Expect::ArrayValue { first: false });
        self.on_value()
    }

    // --------------------------------------------------------------------------------------------
    // Lexing
    // --------------------------------------------------------------------------------------------

    /// Consumes the comma in front of a member. In lenient mode the comma is
    /// optional everywhere.
    fn separator(&mut self, first: bool, missing: &'static str) -> Result<(), &'static str> {
        let comma = self.peek() == Some(b',');
        if self.options.strict_separators {
            if first && comma {
                return Err("Unexpected ','");
            }
            if !first && !comma {
                return Err(missing);
            }
        }
        if comma {
            self.cursor += 1;
        }
        Ok(())
    }

    fn open(&mut self, kind: TokenKind, expect: Expect) -> Token {
        // One stack entry per open container.
        if self
            .options
            .max_depth
            .is_some_and(|max| self.expect.len() >= max)
        {
            return self.fail("Maximum nesting depth exceeded");
        }
        self.expect.push(expect);
        self.single(kind)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let span = Span::new(self.cursor, 1);
        self.cursor += 1;
        Token::new(kind, span)
    }

    /// Lexes a string literal. The cursor is on the opening quote; the span
    /// excludes both quotes.
    fn string_token(&mut self) -> Token {
        let open = self.cursor;
        let start = open + 1;
        let mut pos = start;

        loop {
            let found = self.input[pos..].find_byteset(b"\"\\");
            let Some(offset) = found else {
                self.cursor = open;
                return self.fail("Unterminated string");
            };
            pos += offset;
            if self.input[pos] == b'"' {
                break;
            }

            pos += 1; // backslash
            match self.input.get(pos) {
                None => {
                    self.cursor = open;
                    return self.fail("Unterminated string");
                }
                Some(b'u') => {
                    for digit in pos + 1..pos + 5 {
                        if !self.input.get(digit).is_some_and(u8::is_ascii_hexdigit) {
                            self.cursor = digit;
                            return self.fail("Incomplete unicode escape sequence");
                        }
                    }
                    pos += 5;
                }
                Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => pos += 1,
                Some(_) => {
                    self.cursor = pos;
                    return self.fail("Invalid escape sequence");
                }
            }
        }

        self.cursor = pos + 1;
        Token::new(TokenKind::String, Span::new(start, pos - start))
    }

    /// Lexes `null`, `true`, `false` or a number from the maximal run of
    /// bareword bytes at the cursor.
    fn bareword_token(&mut self) -> Token {
        let start = self.cursor;
        let len = self.input[start..]
            .iter()
            .take_while(|&&b| is_bareword(b))
            .count();
        if len == 0 {
            return self.fail("Value must not be empty");
        }

        let span = Span::new(start, len);
        let word = &self.input[span.range()];
        let kind = match word {
            b"null" => Some(TokenKind::Null),
            b"true" | b"false" => Some(TokenKind::Bool),
            _ => None,
        };
        if let Some(kind) = kind {
            self.cursor += len;
            return Token::new(kind, span);
        }

        let stray = word.iter().position(|&b| !is_number_byte(b));
        if let Some(stray) = stray {
            self.cursor += stray;
            return self.fail("Expected string, array, object, null, boolean or number");
        }

        let Some(kind) = classify_number(word) else {
            return self.fail("Invalid number");
        };
        self.cursor += len;
        Token::new(kind, span)
    }

    fn skip_whitespace(&mut self) {
        let skipped = self.input[self.cursor..]
            .iter()
            .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .count();
        self.cursor += skipped;
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }

    /// Latches the error state with the cursor on the fault.
    fn fail(&mut self, message: &'static str) -> Token {
        debug_event!(
            offset = self.cursor,
            reason = message,
            "tokenizer latched into error state"
        );
        self.expect.push(Expect::Error);
        Token::error(SyntaxError {
            offset: self.cursor,
            message,
        })
    }
}

/// Returns the span of `token` after checking its kind.
#[track_caller]
fn span_of(token: &Token, accepts: impl Fn(TokenKind) -> bool, operation: &str) -> Span {
    match token.span() {
        Some(span) if accepts(token.kind()) => span,
        _ => panic!("{operation} called on a {} token", token.kind()),
    }
}

fn is_bareword(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'+' | b'-')
}

fn is_number_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'e' | b'E' | b'.' | b'+' | b'-')
}
