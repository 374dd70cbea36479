/// Insert `insertion` into `text` at byte `offset`.
///
/// # Panics
///
/// Panics when `offset` is past the end of `text` or not on a char boundary.
pub fn splice(text: &str, insertion: &str, offset: usize) -> String {
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..offset]);
    out.push_str(insertion);
    out.push_str(&text[offset..]);
    out
}

/// True when only spaces or tabs separate `offset` from the start of its line
pub(crate) fn at_line_start(text: &str, offset: usize) -> bool {
    text[..offset]
        .bytes()
        .rev()
        .take_while(|b| *b != b'\n')
        .all(|b| b == b' ' || b == b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_middle() {
        assert_eq!(splice("abcd", "XY", 2), "abXYcd");
    }

    #[test]
    fn test_splice_edges() {
        assert_eq!(splice("abc", "X", 0), "Xabc");
        assert_eq!(splice("abc", "X", 3), "abcX");
        assert_eq!(splice("", "X", 0), "X");
    }

    #[test]
    #[should_panic]
    fn test_splice_out_of_range() {
        splice("abc", "X", 4);
    }

    #[test]
    fn test_at_line_start() {
        assert!(at_line_start("", 0));
        assert!(at_line_start("a\n", 2));
        assert!(at_line_start("a\n\t  ", 5));
        assert!(!at_line_start("func init() {}", 13));
        assert!(!at_line_start("package main", 12));
    }
}
