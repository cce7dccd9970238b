//! Text helpers shared by the classifier and the field decoder.

/// Splits `head (inner)` into its leading text and parenthesised tail.
///
/// A missing closing parenthesis is tolerated. Both parts are trimmed.
#[must_use]
pub fn split_parenthetical(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();
    match text.find('(') {
        Some(open) => {
            let rest = &text[open + 1..];
            let inner = rest.strip_suffix(')').unwrap_or(rest);
            (text[..open].trim(), Some(inner.trim()))
        }
        None => (text, None),
    }
}

/// Splits `text` on any of `separators`, trimming tokens and dropping empties.
pub fn split_tokens<'a>(text: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> {
    text.split(separators)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parses a `0x`-prefixed (or bare) hexadecimal `u32`.
#[must_use]
pub fn parse_hex_u32(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
