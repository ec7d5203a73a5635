//! Cookie header lookup used to fetch the anti-forgery token.

use percent_encoding::percent_decode_str;

/// Returns the decoded value of cookie `name` from a `Cookie` header value
/// (`a=1; csrftoken=abc; b=2`). The first matching pair wins. Only `%XX`
/// escapes are decoded; `+` is kept as is.
pub fn read_cookie(header: &str, name: &str) -> Option<String> {
    if header.trim().is_empty() || name.is_empty() {
        return None;
    }

    header
        .split(';')
        .map(str::trim)
        .filter(|pair| {
            pair.len() > name.len()
                && pair.starts_with(name)
                && pair.as_bytes()[name.len()] == b'='
        })
        .find_map(|pair| {
            percent_decode_str(&pair[name.len() + 1..])
                .decode_utf8()
                .ok()
                .map(|value| value.into_owned())
        })
}
