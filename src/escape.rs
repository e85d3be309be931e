//! HTML- and href-escaping helpers shared by the default HTML renderer.
//!
//! Grounded on `original_source/html/houdini_html_e.c`'s escape table (OWASP
//! rules: `&`, `<`, `>`, `"`, `'`, and conditionally `/`) and on the general
//! shape of `houdini_escape_href` as described in `html.c` (the `.c` file
//! itself wasn't in the reference pack, so the safe-byte set below is
//! reconstructed from RFC 3986 unreserved characters plus the extra bytes
//! `html.c` visibly leaves unescaped in its href output).

/// HTML-escapes `src`, appending the result to `out`.
///
/// `secure` additionally escapes `/` as `&#47;`, which helps terminate an
/// HTML entity that an attacker might otherwise smuggle through a
/// not-fully-escaped attribute value. Body text always escapes securely;
/// fragment-identifier-like content may choose not to.
///
/// Operates byte-wise, mirroring `houdini_escape_html0`'s raw `bufput` of
/// each unescaped run: `src` is opaque bytes (possibly multi-byte UTF-8
/// sequences), not a sequence of Unicode scalar values, so runs between
/// escaped bytes are copied verbatim rather than decoded and re-encoded.
///
/// Note: this function is not idempotent under repeated application --
/// escaping its own output a second time double-escapes the `&` it just
/// produced (`&amp;` becomes `&amp;amp;`). That's expected of HTML escaping
/// in general and is not "fixed" here.
pub fn html(out: &mut Vec<u8>, src: &[u8], secure: bool) {
    let mut run_start = 0;
    for (i, &byte) in src.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"&quot;",
            b'&' => b"&amp;",
            b'\'' => b"&#39;",
            b'/' if secure => b"&#47;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            _ => continue,
        };
        out.extend_from_slice(&src[run_start..i]);
        out.extend_from_slice(escape);
        run_start = i + 1;
    }
    out.extend_from_slice(&src[run_start..]);
}

/// Returns true for bytes considered "safe" inside an href without
/// percent-escaping: RFC 3986 unreserved characters, plus the punctuation
/// `html.c` leaves untouched (`:/?#[]@!$&'()*+,;=~%`) since it already
/// appears as a structural part of a well-formed URL.
fn is_href_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b':'
                | b'/'
                | b'?'
                | b'#'
                | b'['
                | b']'
                | b'@'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b'%'
        )
}

/// Percent-escapes bytes outside the href-safe set, appending to `out`.
pub fn href(out: &mut Vec<u8>, src: &[u8]) {
    for &byte in src {
        if is_href_safe(byte) {
            out.push(byte);
        } else {
            out.extend_from_slice(format!("%{:02X}", byte).as_bytes());
        }
    }
}
