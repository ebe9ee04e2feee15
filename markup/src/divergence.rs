/// Byte offset of the first character at which `a` and `b` differ.
///
/// Returns `None` when the strings are equal. When one is a prefix of the
/// other, the offset is the length of the shorter one. The offset always lies
/// on a character boundary of both strings.
pub fn first_divergence(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let mut b_chars = b.chars();
    for (offset, ca) in a.char_indices() {
        match b_chars.next() {
            Some(cb) if cb == ca => {}
            _ => return Some(offset),
        }
    }
    Some(a.len())
}
