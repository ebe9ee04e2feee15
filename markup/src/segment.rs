use std::iter::FusedIterator;

/// The character every fragment except possibly the last ends with.
pub const LINE_TERMINATOR: char = '\n';

/// Split `text` into line fragments, terminators included.
///
/// Concatenating the fragments reproduces `text` exactly. A text ending on a
/// terminator yields no trailing empty fragment, and the empty string yields
/// nothing at all. The iterator is `Clone`, so a sequence can be restarted by
/// cloning it before consumption or by calling `lines` again.
pub fn lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

/// Lazy iterator over the line fragments of a text. See [`lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Lines<'a> {
    /// The part of the text not yet yielded.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .find(LINE_TERMINATOR)
            .map(|pos| pos + LINE_TERMINATOR.len_utf8())
            .unwrap_or(self.rest.len());
        let (fragment, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(fragment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.rest.is_empty() {
            (0, Some(0))
        } else {
            (1, Some(self.rest.len()))
        }
    }
}

impl FusedIterator for Lines<'_> {}
