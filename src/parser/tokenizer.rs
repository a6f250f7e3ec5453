//! Documentation-comment tokenizer.
//!
//! Lexes one comment slice into markup tokens. Token classes are bitmask
//! values so callers can skip ahead with `consume(mask)`, e.g.
//! `consume(WORD)` to pick up the positional argument of `@param`.

/// Token class bitmask.
pub type TokenKind = u16;

pub const NONE: TokenKind = 0;
/// Comment opener: `/**`, `/*!`, `///` or `//!`. First token, at most once.
pub const OPEN: TokenKind = 1 << 0;
/// Comment terminator `*/`.
pub const CLOSE: TokenKind = 1 << 1;
/// `@name` or `\name`, including an option payload such as `param[in,out]`.
pub const COMMAND: TokenKind = 1 << 2;
/// Two-character escape of reserved punctuation, e.g. `\@`.
pub const ESCAPE: TokenKind = 1 << 3;
/// Run of non-whitespace text.
pub const WORD: TokenKind = 1 << 4;
/// Inline horizontal whitespace.
pub const WHITESPACE: TokenKind = 1 << 5;
/// Single line break, with any leading `*` decoration stripped.
pub const LINE: TokenKind = 1 << 6;
/// Two or more line breaks: a paragraph break.
pub const PARA: TokenKind = 1 << 7;
/// Sentence-ending punctuation followed by whitespace.
pub const SENTENCE: TokenKind = 1 << 8;

/// One token, with its byte span within the comment slice.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn is(&self, mask: TokenKind) -> bool {
        self.kind & mask != 0
    }
}

/// Lazy tokenizer over one comment slice. `Clone` gives cheap lookahead.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Tokenizer { src, pos: 0 }
    }

    /// Next token, or a `NONE` token at the end of the slice.
    pub fn next(&mut self) -> Token<'a> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return self.token(NONE, start);
        }

        if start == 0 {
            for opener in ["/**", "/*!", "///", "//!"] {
                if self.src.starts_with(opener) {
                    self.pos = opener.len();
                    return self.token(OPEN, start);
                }
            }
        }

        if self.src[start..].starts_with("*/") {
            self.pos = start + 2;
            return self.token(CLOSE, start);
        }

        let b = bytes[start];

        if b == b'\n' || b == b'\r' {
            return self.line_break(start);
        }

        if b == b' ' || b == b'\t' {
            self.skip_horizontal();
            return self.token(WHITESPACE, start);
        }

        if b == b'@' || b == b'\\' {
            if let Some(token) = self.command_or_escape(start) {
                return token;
            }
        }

        if matches!(b, b'.' | b'!' | b'?') && self.sentence_boundary(start + 1) {
            self.pos = start + 1;
            return self.token(SENTENCE, start);
        }

        self.word(start)
    }

    /// Skip forward to the next token whose class is in `stop`, consuming
    /// it. Returns the stopping token, or `NONE` at the end of the slice.
    pub fn consume(&mut self, stop: TokenKind) -> Token<'a> {
        let mut token = self.next();
        while token.kind != NONE && !token.is(stop) {
            token = self.next();
        }
        token
    }

    /// Consume a single whitespace token, if one is next.
    pub fn skip_whitespace(&mut self) {
        let save = self.clone();
        if !self.next().is(WHITESPACE) {
            *self = save;
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token {
            kind,
            start,
            end: self.pos,
            text: &self.src[start..self.pos],
        }
    }

    fn skip_horizontal(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// A run of one or more newlines. Leading `*` decoration and the
    /// indentation around it are part of the token and stripped from the
    /// text the translator sees.
    fn line_break(&mut self, start: usize) -> Token<'a> {
        let bytes = self.src.as_bytes();
        let mut newlines = 0;
        loop {
            if self.src[self.pos..].starts_with("\r\n") {
                self.pos += 2;
            } else if matches!(bytes.get(self.pos), Some(&b'\n') | Some(&b'\r')) {
                self.pos += 1;
            } else {
                break;
            }
            newlines += 1;
            self.skip_horizontal();
            if bytes.get(self.pos) == Some(&b'*') && bytes.get(self.pos + 1) != Some(&b'/') {
                self.pos += 1;
                self.skip_horizontal();
            }
        }
        let kind = if newlines >= 2 { PARA } else { LINE };
        self.token(kind, start)
    }

    /// `@ident`, `\ident`, `@param[in,out]`, the formula markers `f$` /
    /// `f[` / `f]`, or a punctuation escape. Returns `None` for a bare
    /// marker, which then lexes as a word.
    fn command_or_escape(&mut self, start: usize) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        let next = *bytes.get(start + 1)?;

        if next.is_ascii_alphabetic() || next == b'_' {
            self.pos = start + 2;
            while self
                .src
                .as_bytes()
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
            {
                self.pos += 1;
            }
            if &self.src[start + 1..self.pos] == "f"
                && matches!(bytes.get(self.pos), Some(&b'$') | Some(&b'[') | Some(&b']'))
            {
                self.pos += 1;
                return Some(self.token(COMMAND, start));
            }
            // option payload, e.g. param[in,out]
            if bytes.get(self.pos) == Some(&b'[') {
                let mut j = self.pos + 1;
                while bytes
                    .get(j)
                    .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b',')
                {
                    j += 1;
                }
                if bytes.get(j) == Some(&b']') {
                    self.pos = j + 1;
                }
            }
            return Some(self.token(COMMAND, start));
        }

        if next.is_ascii_punctuation() {
            self.pos = start + 2;
            return Some(self.token(ESCAPE, start));
        }

        None
    }

    fn sentence_boundary(&self, at: usize) -> bool {
        match self.src.as_bytes().get(at) {
            None => true,
            Some(b) if b.is_ascii_whitespace() => true,
            _ => self.src[at..].starts_with("*/"),
        }
    }

    fn word(&mut self, start: usize) -> Token<'a> {
        let mut end = self.src.len();
        let mut chars = self.src[start..].char_indices();
        let _ = chars.next(); // the first char always belongs to the word
        for (i, c) in chars {
            let at = start + i;
            let stop = c.is_whitespace()
                || c == '@'
                || c == '\\'
                || (c == '*' && self.src[at..].starts_with("*/"))
                || (matches!(c, '.' | '!' | '?') && self.sentence_boundary(at + 1));
            if stop {
                end = at;
                break;
            }
        }
        self.pos = end;
        self.token(WORD, start)
    }
}
