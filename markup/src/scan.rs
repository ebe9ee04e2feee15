/// One unit of a markup string: a run of literal text or a single tag.
///
/// Each variant borrows the exact input slice, so concatenating the pieces of
/// a scan reproduces the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    /// An opening tag such as `<span class="hljs-comment">`.
    Open(&'a str),
    /// A closing tag such as `</span>`.
    Close(&'a str),
}

impl<'a> Piece<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Piece::Text(s) | Piece::Open(s) | Piece::Close(s) => s,
        }
    }
}

/// Single-pass scanner splitting markup at tag boundaries.
///
/// A tag begins with `<` followed by an ASCII letter (open) or `/` (close) and
/// runs to the next `>`. A `<` that cannot start such a tag is literal text.
/// Text runs are maximal: two `Text` pieces are never yielded back to back.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if let Some(len) = tag_len(rest) {
            let tag = &rest[..len];
            self.pos += len;
            return Some(if tag.starts_with("</") {
                Piece::Close(tag)
            } else {
                Piece::Open(tag)
            });
        }

        // Literal text up to the next `<` that actually opens a tag.
        let mut end = if rest.starts_with('<') { 1 } else { 0 };
        loop {
            match rest[end..].find('<') {
                Some(offset) => {
                    let at = end + offset;
                    if tag_len(&rest[at..]).is_some() {
                        end = at;
                        break;
                    }
                    end = at + 1;
                }
                None => {
                    end = rest.len();
                    break;
                }
            }
        }

        self.pos += end;
        Some(Piece::Text(&rest[..end]))
    }
}

/// Length in bytes of the tag starting at the beginning of `s`, if any.
///
/// Looks no further than the next `<`, so a run of unterminated tags is
/// scanned once in total.
fn tag_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('<')?;
    let name = body.strip_prefix('/').unwrap_or(body);
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = body.find(['<', '>'])?;
    if body.as_bytes()[end] != b'>' {
        return None;
    }
    Some(end + 2)
}
