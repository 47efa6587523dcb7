//! Invocation tokenizer.
//!
//! Splits a raw invocation string into positional tokens and named (flag)
//! tokens, honoring quoting and escaping. The rules are applied left to
//! right over the character stream:
//!
//! - `\` escapes the following character.
//! - A recognized opening quote begins a span consumed verbatim until its
//!   matching closing quote; the span finalizes as one token.
//! - `-` opens a flag name (`-x` one character, `--name` up to the next
//!   space); a dash run with no name is emitted as a literal positional.
//! - A space finalizes the pending token, if any.
//!
//! Repeat occurrences of the same flag accumulate rather than overwrite.
//!
//! # Examples
//!
//! ```
//! use bosun_core::tokenize;
//!
//! let tokens = tokenize(r#"say "hello world" --tag x --tag y"#).unwrap();
//! assert_eq!(tokens.args, vec!["say", "hello world"]);
//! assert_eq!(tokens.kwargs["tag"], vec!["x", "y"]);
//! ```

use std::collections::HashMap;
use std::mem;
use std::str::Chars;

use crate::error::TokenizeError;

/// Recognized quote pairs. Not limited to ASCII: the table covers the
/// typographic and CJK quote styles chat clients commonly substitute.
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('‘', '’'),
    ('‚', '‛'),
    ('“', '”'),
    ('„', '‟'),
    ('«', '»'),
    ('‹', '›'),
    ('《', '》'),
    ('〈', '〉'),
    ('「', '」'),
    ('『', '』'),
    ('﹁', '﹂'),
    ('﹃', '﹄'),
    ('＂', '＂'),
    ('｢', '｣'),
    ('〝', '〞'),
    ('⹂', '⹂'),
];

fn closing_quote(opening: char) -> Option<char> {
    QUOTE_PAIRS
        .iter()
        .find(|(open, _)| *open == opening)
        .map(|(_, close)| *close)
}

/// The result of tokenizing one invocation string.
///
/// `args` preserves token order, which defines positional parameter
/// assignment. `kwargs` maps each flag name to its value occurrences in
/// order; key order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// Positional tokens, in input order.
    pub args: Vec<String>,
    /// Flag name to ordered value occurrences.
    pub kwargs: HashMap<String, Vec<String>>,
}

impl TokenStream {
    /// An empty token stream.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Signature of a tokenizer, for commands that swap in their own.
pub type TokenizeFn = fn(&str) -> Result<TokenStream, TokenizeError>;

/// Tokenizes an invocation string into positional and flag tokens.
///
/// Fails only on malformed quoting; every other input produces a token
/// stream. See the [module docs](self) for the full rule set.
pub fn tokenize(content: &str) -> Result<TokenStream, TokenizeError> {
    Lexer::new(content).run()
}

/// Character-stream state: a flag name buffer (open while a `-x`/`--name`
/// awaits its value), a value buffer, and the accumulated output.
struct Lexer<'a> {
    chars: Chars<'a>,
    name: String,
    value: String,
    tokens: TokenStream,
}

impl<'a> Lexer<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars(),
            name: String::new(),
            value: String::new(),
            tokens: TokenStream::new(),
        }
    }

    /// Flushes the pending buffers: the value becomes a positional token,
    /// or one occurrence of the open flag's value.
    fn finalize(&mut self) {
        let value = mem::take(&mut self.value);
        if self.name.is_empty() {
            self.tokens.args.push(value);
        } else {
            let name = mem::take(&mut self.name);
            self.tokens.kwargs.entry(name).or_default().push(value);
        }
    }

    fn run(mut self) -> Result<TokenStream, TokenizeError> {
        while let Some(ch) = self.chars.next() {
            if ch == '\\' {
                // Escape: the next character, if any, is taken literally.
                if let Some(escaped) = self.chars.next() {
                    self.value.push(escaped);
                }
            } else if let Some(closing) = closing_quote(ch) {
                self.consume_quoted(ch, closing)?;
            } else if ch == '-' {
                self.consume_flag_name();
            } else if ch == ' ' {
                if !self.value.is_empty() {
                    self.finalize();
                }
            } else {
                self.value.push(ch);
            }
        }

        if !self.name.is_empty() || !self.value.is_empty() {
            self.finalize();
        }

        Ok(self.tokens)
    }

    /// Consumes a quoted span verbatim (respecting escapes) up to the
    /// matching closing delimiter, then finalizes it as one token.
    fn consume_quoted(&mut self, opening: char, closing: char) -> Result<(), TokenizeError> {
        loop {
            match self.chars.next() {
                Some(ch) if ch == closing => break,
                Some('\\') => {
                    // Consume the escaped character so an escaped closing
                    // delimiter does not end the span.
                    if let Some(escaped) = self.chars.next() {
                        self.value.push(escaped);
                    }
                }
                Some(ch) => self.value.push(ch),
                None => {
                    return Err(TokenizeError::UnterminatedQuote {
                        opening,
                        expected: closing,
                    });
                }
            }
        }

        self.finalize();
        Ok(())
    }

    /// Handles a `-`: closes any open flag first, then reads the new flag
    /// name (`--` long mode up to the next space, single `-` exactly one
    /// character). A bare dash run becomes a literal positional token.
    fn consume_flag_name(&mut self) {
        if !self.name.is_empty() {
            self.finalize();
        }

        let mut dashes = 1;
        match self.chars.next() {
            Some('-') => {
                dashes = 2;
                while let Some(ch) = self.chars.next() {
                    if ch == ' ' {
                        break;
                    }
                    self.name.push(ch);
                }
            }
            Some(' ') | None => {}
            Some(ch) => self.name.push(ch),
        }

        if self.name.is_empty() {
            self.tokens.args.push("-".repeat(dashes));
        }
    }
}
