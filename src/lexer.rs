//! Whitespace tokenization of a single command line.
//!
//! A [`Line`] is a cursor over borrowed text. Every call to
//! [`Line::next_token`] hands out the next whitespace-delimited word and
//! moves the cursor past the separator that ended it, so the unconsumed
//! suffix can be passed on to whoever wants the remaining arguments.

/// Returns true for characters that separate tokens inside a line.
pub(crate) fn is_separator(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// A command line being consumed token by token.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Line<'a> {
    /// Create a cursor at the start of `text`.
    ///
    /// A newline terminates the line; anything after it is never tokenized.
    pub fn new(text: &'a str) -> Self {
        let end = text.find('\n').unwrap_or(text.len());
        Self {
            text: &text[..end],
            pos: 0,
        }
    }

    /// Extract the next token, or `None` once the line is exhausted.
    ///
    /// Calling this again on an exhausted line keeps returning `None`.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let text = self.text;
        let (start, end) = token_bounds(text, self.pos);
        if start == end {
            self.pos = end;
            return None;
        }
        // Step over the separator that ended the token, if there is one.
        self.pos = match text[end..].chars().next() {
            Some(ch) => end + ch.len_utf8(),
            None => end,
        };
        Some(&text[start..end])
    }

    /// The part of the line that has not been consumed yet.
    pub fn rest(&self) -> &'a str {
        let text = self.text;
        &text[self.pos..]
    }
}

impl<'a> Iterator for Line<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Byte offsets `(start, end)` of the token beginning at or after `from`.
///
/// Leading spaces and tabs are skipped; the token runs until the next
/// separator or the end of `text`. An empty span means there is no token.
pub(crate) fn token_bounds(text: &str, from: usize) -> (usize, usize) {
    let start = text[from..]
        .find(|c: char| !is_separator(c))
        .map_or(text.len(), |i| from + i);
    let end = text[start..]
        .find(|c: char| is_separator(c) || c == '\n')
        .map_or(text.len(), |i| start + i);
    (start, end)
}
