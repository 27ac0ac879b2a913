//! Character cursor driving the lexer's rule-matching loop.
//!
//! Stores the full source as a char vector (with a parallel byte-offset
//! table so spans stay byte-accurate for downstream tools) plus the current
//! absolute char offset, 1-based line, and 1-based column. Column resets to
//! 1 on every newline; line increments.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Sentinel returned once the cursor runs past the end of input.
pub const EOF_CHAR: char = '\0';

pub struct Cursor {
    chars: Vec<char>,
    byte_offsets: Vec<u32>,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut byte_offsets = Vec::with_capacity(source.len());
        for (byte_idx, ch) in source.char_indices() {
            chars.push(ch);
            byte_offsets.push(byte_idx as u32);
        }
        byte_offsets.push(source.len() as u32);

        Self {
            chars,
            byte_offsets,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.chars.len()
    }

    pub fn byte_offset(&self) -> u32 {
        self.byte_offsets[self.offset.min(self.byte_offsets.len() - 1)]
    }

    pub fn current_char(&self) -> char {
        self.chars.get(self.offset).copied().unwrap_or(EOF_CHAR)
    }

    /// Peeks `offset` chars ahead of the cursor (0 = current char).
    /// When `skip_whitespace` is set, whitespace chars are skipped before
    /// counting `offset` — used sparingly; see `ymir-lexer`'s module docs
    /// for the documented decision to *not* use this for numeric literals.
    pub fn peek(&self, offset: usize, skip_whitespace: bool) -> char {
        self.peek_with_index(offset, skip_whitespace).0
    }

    pub fn peek_with_index(&self, offset: usize, skip_whitespace: bool) -> (char, usize) {
        let mut idx = self.offset;
        let mut steps_left = offset;
        loop {
            if skip_whitespace {
                while self.chars.get(idx).is_some_and(|c| c.is_whitespace()) {
                    idx += 1;
                }
            }
            if steps_left == 0 {
                break;
            }
            idx += 1;
            steps_left -= 1;
        }
        (self.chars.get(idx).copied().unwrap_or(EOF_CHAR), idx)
    }

    /// Returns the current char, then advances by one (convenience used by
    /// rules that consume exactly one char, e.g. punctuation).
    pub fn read(&mut self) -> char {
        let c = self.current_char();
        self.advance(1, false);
        c
    }

    pub fn advance(&mut self, n: usize, skip_whitespace: bool) {
        for _ in 0..n {
            if skip_whitespace {
                while !self.is_eof() && self.current_char().is_whitespace() {
                    self.step_one();
                }
            }
            if self.is_eof() {
                break;
            }
            self.step_one();
        }
    }

    fn step_one(&mut self) {
        if self.current_char() == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.offset += 1;
    }

    /// The remaining source as a `&str`-like slice for regex matching.
    pub fn remaining(&self) -> String {
        self.chars[self.offset.min(self.chars.len())..].iter().collect()
    }

    /// Longest anchored (`^`) match of `pattern` at the cursor, or `None`.
    /// Returns the matched text; callers advance the cursor themselves so
    /// line/column bookkeeping stays centralized in `advance`.
    pub fn read_regex(&self, pattern: &CachedRegex) -> Option<String> {
        let rest = self.remaining();
        pattern.get().find(&rest).map(|m| m.as_str().to_string())
    }

    pub fn peek_regex(&self, pattern: &CachedRegex) -> Option<String> {
        self.read_regex(pattern)
    }
}

/// A regex compiled lazily and cached for the lifetime of the process,
/// matching the pack's habit of hoisting hot-path patterns into
/// `once_cell`/`lazy_static` statics instead of recompiling per call.
pub struct CachedRegex {
    pattern: &'static str,
    cell: OnceCell<Regex>,
}

impl CachedRegex {
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> &Regex {
        self.cell
            .get_or_init(|| Regex::new(self.pattern).expect("static regex pattern is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column() {
        let mut cur = Cursor::new("ab\ncd");
        assert_eq!((cur.line, cur.column), (1, 1));
        cur.advance(3, false); // past "ab\n"
        assert_eq!((cur.line, cur.column), (2, 1));
        cur.advance(1, false);
        assert_eq!((cur.line, cur.column), (2, 2));
    }

    #[test]
    fn eof_yields_sentinel() {
        let cur = Cursor::new("a");
        assert_eq!(cur.peek(5, false), EOF_CHAR);
    }

    #[test]
    fn read_regex_is_anchored_and_longest_match() {
        static NUM: CachedRegex = CachedRegex::new(r"^-?(?:\d+\.\d+|\.\d+|\d+)");
        let cur = Cursor::new("123.45abc");
        assert_eq!(cur.read_regex(&NUM).as_deref(), Some("123.45"));
    }
}
