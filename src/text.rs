/// Small string utilities shared by the signature parser and the section
/// processors.

/// Split text at the first newline. Returns the first line (without the
/// newline) and the remainder (without the leading newline).
pub fn first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, ""),
    }
}

/// True when the line contains nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Case-insensitive equality on ASCII keywords.
pub fn iequal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Normalize an accumulating buffer so the next fragment starts after a
/// blank line: guarantees the buffer ends with exactly "\n\n"-style
/// separation (one newline appended per missing one).
pub fn two_newlines(buffer: &mut String) {
    if buffer.is_empty() {
        return;
    }
    if !buffer.ends_with('\n') {
        buffer.push('\n');
    }
    if !buffer.ends_with("\n\n") {
        buffer.push('\n');
    }
}

/// Normalize recovered (mis-indented) content into an asset body: the text
/// is terminated with a newline and a closing blank line.
pub fn recovered_asset(text: &str) -> String {
    let mut body = text.trim_end_matches('\n').to_string();
    body.push_str("\n\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_splits_without_newlines() {
        assert_eq!(first_line("one\ntwo\nthree"), ("one", "two\nthree"));
        assert_eq!(first_line("single"), ("single", ""));
    }

    #[test]
    fn two_newlines_is_idempotent() {
        let mut s = String::from("a");
        two_newlines(&mut s);
        assert_eq!(s, "a\n\n");
        two_newlines(&mut s);
        assert_eq!(s, "a\n\n");
    }

    #[test]
    fn recovered_asset_appends_blank_line() {
        assert_eq!(recovered_asset("p1"), "p1\n\n");
        assert_eq!(recovered_asset("dangling\n"), "dangling\n\n");
    }
}
