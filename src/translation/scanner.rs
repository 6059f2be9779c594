use super::parsers::{
    dollar_quote_close, dollar_quote_open, is_block_comment_end, is_block_comment_start,
    is_line_comment_start,
};

#[derive(Clone, PartialEq, Eq)]
enum State<'a> {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(&'a [u8]),
}

/// If a string literal, comment or dollar-quoted body opens at `idx`, return the index just past
/// its end (or the end of input when it never closes). Plain SQL returns `None`.
pub(super) fn literal_end(bytes: &[u8], idx: usize) -> Option<usize> {
    let (mut state, mut i) = match bytes.get(idx)? {
        b'\'' => (State::SingleQuoted, idx + 1),
        b'"' => (State::DoubleQuoted, idx + 1),
        _ if is_line_comment_start(bytes, idx) => (State::LineComment, idx + 2),
        _ if is_block_comment_start(bytes, idx) => (State::BlockComment(1), idx + 2),
        b'$' => {
            let (tag, after) = dollar_quote_open(bytes, idx)?;
            (State::DollarQuoted(tag), after)
        }
        _ => return None,
    };

    while i < bytes.len() && state != State::Normal {
        let b = bytes[i];
        match state {
            State::SingleQuoted | State::DoubleQuoted => {
                let quote = if state == State::SingleQuoted { b'\'' } else { b'"' };
                if b == quote {
                    if bytes.get(i + 1) == Some(&quote) {
                        i += 1; // doubled quote is an escape
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, i) {
                    state = State::BlockComment(depth + 1);
                    i += 1;
                } else if is_block_comment_end(bytes, i) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    i += 1;
                }
            }
            State::DollarQuoted(tag) => {
                if let Some(after) = dollar_quote_close(bytes, i, tag) {
                    state = State::Normal;
                    i = after;
                    continue;
                }
            }
            State::Normal => unreachable!("loop exits on Normal"),
        }
        i += 1;
    }

    Some(i.min(bytes.len()))
}
