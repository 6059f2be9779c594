pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// `$tag$` opener at `start`; returns the tag and the index just past the closing `$`.
pub(super) fn dollar_quote_open(bytes: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        // a tag cannot start with a digit, otherwise `$1` would open a quote
        if !(b.is_ascii_alphabetic() || b == b'_' || (idx > start + 1 && b.is_ascii_digit())) {
            return None;
        }
        idx += 1;
    }

    (idx < bytes.len()).then(|| (&bytes[start + 1..idx], idx + 1))
}

/// `$tag$` closer at `idx`; returns the index just past it.
pub(super) fn dollar_quote_close(bytes: &[u8], idx: usize, tag: &[u8]) -> Option<usize> {
    let end = idx + 1 + tag.len();
    (bytes.get(idx) == Some(&b'$')
        && bytes.get(idx + 1..end) == Some(tag)
        && bytes.get(end) == Some(&b'$'))
    .then_some(end + 1)
}

pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<usize> {
    let end = start
        + bytes
            .get(start..)?
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
    (end > start).then_some(end)
}
