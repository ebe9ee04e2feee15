use crate::scan::{Piece, Scanner};

/// Merge span fragments produced by line-at-a-time highlighting.
///
/// Highlighting a document one line at a time closes every open span at the
/// end of each line and reopens the same spans at the start of the next. This
/// rewrites such `close ... close open ... open` runs back into the single
/// continuous spans a whole-document pass produces. A close is only elided when
/// it is followed, with no text in between, by an open tag identical to the one
/// it would close at that depth. Text is copied verbatim and in order, and the
/// result is well nested whenever the input is.
///
/// ```
/// let merged = markup::normalize(r#"<span class="c">a</span><span class="c">b</span>"#);
/// assert_eq!(merged, r#"<span class="c">ab</span>"#);
/// ```
pub fn normalize(markup: &str) -> String {
    let mut normalizer = Normalizer::with_capacity(markup.len());
    for piece in Scanner::new(markup) {
        normalizer.feed(piece);
    }
    normalizer.finish()
}

/// The text of `markup` with every tag removed.
pub fn strip_tags(markup: &str) -> String {
    Scanner::new(markup)
        .filter_map(|piece| match piece {
            Piece::Text(text) => Some(text),
            Piece::Open(_) | Piece::Close(_) => None,
        })
        .collect()
}

struct Normalizer<'a> {
    out: String,
    /// Open tags in nesting order, innermost last.
    stack: Vec<&'a str>,
    /// Closing tags seen but not yet written, oldest first.
    deferred: Vec<&'a str>,
}

impl<'a> Normalizer<'a> {
    fn with_capacity(capacity: usize) -> Self {
        Normalizer {
            out: String::with_capacity(capacity),
            stack: Vec::new(),
            deferred: Vec::new(),
        }
    }

    fn feed(&mut self, piece: Piece<'a>) {
        match piece {
            Piece::Text(text) => {
                self.commit();
                self.out.push_str(text);
            }
            Piece::Close(tag) => self.deferred.push(tag),
            Piece::Open(tag) => {
                if self.reopens(tag) {
                    // The span at this depth continues: drop its close and this open.
                    self.deferred.pop();
                } else {
                    self.commit();
                    self.out.push_str(tag);
                    self.stack.push(tag);
                }
            }
        }
    }

    /// Whether `tag` reopens the span the outermost deferred close would end.
    fn reopens(&self, tag: &str) -> bool {
        if self.deferred.is_empty() {
            return false;
        }
        self.stack
            .len()
            .checked_sub(self.deferred.len())
            .and_then(|depth| self.stack.get(depth))
            .is_some_and(|open| *open == tag)
    }

    fn commit(&mut self) {
        for tag in self.deferred.drain(..) {
            self.out.push_str(tag);
            self.stack.pop();
        }
    }

    fn finish(mut self) -> String {
        self.commit();
        self.out
    }
}
