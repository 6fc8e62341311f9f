//! Line scanning and number decoding shared by both report parsers.

/// Iterate over every line of `text` that contains `marker`.
///
/// Each item is the slice starting at the marker and running to the end of
/// its line, so tool prefixes such as valgrind's `==1234==` are dropped.
/// Only the first occurrence within a line is reported.
pub fn marker_lines<'a>(text: &'a str, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.lines()
        .filter_map(move |line| line.find(marker).map(|idx| &line[idx..]))
}

/// The last line of `text` containing `marker`, cut at the marker
pub fn last_marker_line<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.lines()
        .rev()
        .find_map(|line| line.rfind(marker).map(|idx| &line[idx..]))
}

/// Parse the unsigned integer directly following `marker` in `line`.
///
/// Leading whitespace is skipped and anything after the digits is ignored,
/// so `"Instrumentation results: 8 stack allocation instructions executed."`
/// yields 8. Returns `None` if no digits follow the marker or the value
/// overflows `u64`.
pub fn leading_uint_after(line: &str, marker: &str) -> Option<u64> {
    let rest = line.strip_prefix(marker)?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok()
}

/// Decode an integer that may contain comma thousands separators ("12,345")
///
/// Every comma-separated group must hold at least one digit, so stray
/// leading, trailing or doubled commas are rejected.
pub fn parse_comma_number(token: &str) -> Option<u64> {
    let mut digits = String::with_capacity(token.len());
    for group in token.split(',') {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    digits.parse().ok()
}
