//! Mapping URL fragments such as `#question-23-9` onto question positions.

const TOKEN_PREFIX: &str = "question-";

/// The part of `url` after the first `#`, if any and non-empty.
pub fn fragment(url: &str) -> Option<&str> {
    let (_, frag) = url.split_once('#')?;
    if frag.is_empty() {
        None
    } else {
        Some(frag)
    }
}

/// First `question-<digits>-<digits>` run inside `fragment`.
pub fn question_token(fragment: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(pos) = fragment[from..].find(TOKEN_PREFIX) {
        let start = from + pos;
        let rest = &fragment[start + TOKEN_PREFIX.len()..];
        if let Some(len) = digits_dash_digits(rest) {
            return Some(&fragment[start..start + TOKEN_PREFIX.len() + len]);
        }
        from = start + TOKEN_PREFIX.len();
    }
    None
}

fn digits_dash_digits(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let first = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if first == 0 || bytes.get(first) != Some(&b'-') {
        return None;
    }
    let second = bytes[first + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if second == 0 {
        return None;
    }
    Some(first + 1 + second)
}

/// Position of the question whose id equals the token in `url`'s fragment.
///
/// `ids` is the question list in document order; questions without an id are
/// passed as `None`. Ids are compared as strings, the numbers inside the
/// token are never decoded.
pub fn resolve_target_index<'a, I>(url: &str, ids: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let token = question_token(fragment(url)?)?;
    ids.into_iter().position(|id| id == Some(token))
}
