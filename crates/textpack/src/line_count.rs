//! Line accounting for bundle budgets

/// Count the lines in `content` using the full set of Unicode line boundaries.
///
/// `\r\n` is one terminator. `\n`, `\r`, `\x0b`, `\x0c`, `\x1c`, `\x1d`,
/// `\x1e`, `\u{85}`, `\u{2028}` and `\u{2029}` each end a line on their own.
/// A trailing fragment without a terminator is one more line, so `"a\nb"` and
/// `"a\nb\n"` both count as 2.
pub fn count_lines(content: &str) -> usize {
    let mut count = 0;
    let mut pending = false;
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if is_line_boundary(c) {
            if c == '\r' {
                chars.next_if_eq(&'\n');
            }
            count += 1;
            pending = false;
        } else {
            pending = true;
        }
    }
    count + usize::from(pending)
}

const fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
