//! Strict UTF-8 percent-decoding.
//!
//! `urlencoding::decode` passes malformed escapes such as `%zz` through
//! untouched. Callers here need those reported, so every `%` is checked for two
//! hex digits before the actual decode runs.

use std::borrow::Cow;

/// Decodes `%XX` escapes in `input` as UTF-8.
///
/// With `plus_as_space` set, `+` decodes to a space first (form encoding), so an
/// escaped `%2B` still yields a literal `+`.
pub fn percent_decode(input: &str, plus_as_space: bool) -> Result<String, String> {
    validate_escapes(input)?;

    let prepared: Cow<'_, str> = if plus_as_space && input.contains('+') {
        Cow::Owned(input.replace('+', " "))
    } else {
        Cow::Borrowed(input)
    };

    urlencoding::decode(&prepared)
        .map(Cow::into_owned)
        .map_err(|e| format!("decoded bytes are not valid UTF-8: {}", e))
}

fn validate_escapes(input: &str) -> Result<(), String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() >= i + 3
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(format!("malformed escape sequence at byte {}", i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
