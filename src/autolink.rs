//! Bare-autolink detection: recognizing a URL, email address, or `www.`
//! prefix that was not wrapped in `<...>` markup, so it can still be
//! rendered as a link.
//!
//! Out of scope per this crate's purpose (an external collaborator with a
//! thin, documented interface): the scanners below are original logic
//! against the contract the inline scanner expects, not a port of
//! `autolink.c` (which wasn't included in the reference pack).

/// A scheme this crate considers safe to link to unconditionally. Used both
/// by the bare-autolink scanners and by the HTML renderer's `SAFELINK` flag.
const SAFE_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto"];

/// Returns true if `url` uses a scheme in the safe allowlist, or has no
/// scheme at all (a relative path).
pub fn is_safe_link(url: &[u8]) -> bool {
    match url.iter().position(|&b| b == b':') {
        None => true,
        Some(colon) => {
            let scheme = &url[..colon];
            SAFE_SCHEMES
                .iter()
                .any(|&s| scheme.eq_ignore_ascii_case(s.as_bytes()))
        }
    }
}

fn is_url_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/' | b'?' | b'#' | b'[' | b']' | b'@' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=' | b'%' | b':')
}

/// Scans a bare `scheme:...` URL starting at `data[offset]` where `data[offset]
/// == ':'`. Returns `(matched_len, rewind)`: `matched_len` is how many bytes
/// starting at the scheme's first byte make up the URL, and `rewind` is how
/// many already-emitted bytes (the scheme, already copied to output by the
/// inactive-run handling) must be discarded before re-emitting the whole
/// thing as a link.
pub fn url(data: &[u8], offset: usize) -> Option<(usize, usize)> {
    if offset == 0 || data.get(offset) != Some(&b':') {
        return None;
    }

    let scheme_start = {
        let mut start = offset;
        while start > 0 && data[start - 1].is_ascii_alphanumeric() {
            start -= 1;
        }
        start
    };

    if scheme_start == offset {
        return None;
    }

    let scheme = &data[scheme_start..offset];
    if !SAFE_SCHEMES
        .iter()
        .any(|&s| scheme.eq_ignore_ascii_case(s.as_bytes()))
    {
        return None;
    }

    if data[offset + 1..].first() != Some(&b'/') || data.get(offset + 2) != Some(&b'/') {
        return None;
    }

    let mut end = offset;
    while end < data.len() && is_url_char(data[end]) {
        end += 1;
    }

    // trailing punctuation that's almost certainly not part of the URL
    while end > offset && matches!(data[end - 1], b'.' | b',' | b';' | b':' | b'!' | b'?') {
        end -= 1;
    }

    if end <= offset + 3 {
        return None;
    }

    let rewind = offset - scheme_start;
    Some((end - scheme_start, rewind))
}

/// Scans a bare `www.` prefix autolink starting at `data[offset] == 'w'`.
pub fn www(data: &[u8], offset: usize) -> Option<(usize, usize)> {
    if !data[offset..].starts_with(b"www.") {
        return None;
    }

    let mut end = offset;
    while end < data.len() && is_url_char(data[end]) {
        end += 1;
    }
    while end > offset && matches!(data[end - 1], b'.' | b',' | b';' | b':' | b'!' | b'?') {
        end -= 1;
    }

    if end <= offset + 4 {
        return None;
    }

    Some((end - offset, 0))
}

fn is_email_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-' | b'+')
}

/// Scans a bare `user@host` email autolink starting at `data[offset] == '@'`.
pub fn email(data: &[u8], offset: usize) -> Option<(usize, usize)> {
    if offset == 0 || data.get(offset) != Some(&b'@') {
        return None;
    }

    let user_start = {
        let mut start = offset;
        while start > 0 && is_email_char(data[start - 1]) {
            start -= 1;
        }
        start
    };

    if user_start == offset {
        return None;
    }

    let mut end = offset + 1;
    let mut saw_dot = false;
    while end < data.len() && (is_email_char(data[end]) || data[end] == b'@') {
        if data[end] == b'.' {
            saw_dot = true;
        }
        if data[end] == b'@' {
            break;
        }
        end += 1;
    }

    if !saw_dot || end <= offset + 1 {
        return None;
    }

    let rewind = offset - user_start;
    Some((end - user_start, rewind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_safe_scheme_url() {
        let data = b"see http://example.com/path for more";
        let colon = data.iter().position(|&b| b == b':').unwrap();
        let (len, rewind) = url(data, colon).unwrap();
        assert_eq!(&data[colon - rewind..colon - rewind + len], &b"http://example.com/path"[..]);
    }

    #[test]
    fn rejects_unsafe_scheme() {
        let data = b"see javascript:alert(1)";
        let colon = data.iter().position(|&b| b == b':').unwrap();
        assert!(url(data, colon).is_none());
    }

    #[test]
    fn recognizes_www_prefix() {
        let data = b"visit www.example.com today";
        let w = data.iter().position(|&b| b == b'w').unwrap();
        let (len, _) = www(data, w).unwrap();
        assert_eq!(&data[w..w + len], &b"www.example.com"[..]);
    }

    #[test]
    fn recognizes_email() {
        let data = b"mail me@example.com please";
        let at = data.iter().position(|&b| b == b'@').unwrap();
        let (len, rewind) = email(data, at).unwrap();
        assert_eq!(&data[at - rewind..at - rewind + len], &b"me@example.com"[..]);
    }

    #[test]
    fn safe_link_allows_relative_paths() {
        assert!(is_safe_link(b"/a/b"));
        assert!(is_safe_link(b"http://x"));
        assert!(!is_safe_link(b"javascript:alert(1)"));
    }
}
