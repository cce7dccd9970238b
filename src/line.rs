//! Line classification.
//!
//! A dump is a flat sequence of lines whose structure is implied by
//! headers and indentation:
//!
//! ```text
//! DNS configuration
//!
//! resolver #1
//!   nameserver[0] : 10.0.0.1
//!   if_index : 15 (en0)
//! ```
//!
//! [`classify`] turns each raw line into a [`Line`]; the
//! [assembler](crate::assembler) gives the sequence its nesting.

/// Header line opening the default resolver section.
pub const SECTION_HEADER: &str = "DNS configuration";

/// Header line opening the scoped resolver section.
pub const SCOPED_SECTION_HEADER: &str = "DNS configuration (for scoped queries)";

/// Prefix of a resolver header, followed by its declared ordinal.
pub const RESOLVER_PREFIX: &str = "resolver #";

/// A classified dump line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `DNS configuration`, optionally `(for scoped queries)`.
    SectionHeader {
        /// `true` for the scoped-queries section.
        scoped: bool,
    },
    /// `resolver #N`.
    ResolverHeader {
        /// The declared ordinal `N`.
        index: usize,
    },
    /// A blank line.
    Separator,
    /// Anything else, with indentation stripped.
    Field(&'a str),
}

/// Classifies a single raw line.
///
/// Never fails: text that is not a header or blank is handed on as a
/// [`Line::Field`] for the decoder to accept or reject.
///
/// ```
/// use scutil_dns::line::{classify, Line};
///
/// assert_eq!(classify("resolver #3"), Line::ResolverHeader { index: 3 });
/// assert_eq!(classify("  order    : 300000"), Line::Field("order    : 300000"));
/// ```
#[must_use]
pub fn classify(raw: &str) -> Line<'_> {
    let text = raw.trim_end();

    if text == SECTION_HEADER {
        return Line::SectionHeader { scoped: false };
    }
    if text == SCOPED_SECTION_HEADER {
        return Line::SectionHeader { scoped: true };
    }

    let text = text.trim_start();
    if text.is_empty() {
        return Line::Separator;
    }
    if let Some(index) = parse_resolver_header(text) {
        return Line::ResolverHeader { index };
    }
    Line::Field(text)
}

/// Classifies every line of `input`, paired with its 1-based line number.
///
/// The iterator borrows `input` and holds no other state, so a dump can be
/// re-classified any number of times.
pub fn lines(input: &str) -> impl Iterator<Item = (usize, Line<'_>)> {
    input
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, classify(raw)))
}

fn parse_resolver_header(text: &str) -> Option<usize> {
    let digits = text.strip_prefix(RESOLVER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_headers() {
        assert_eq!(classify("DNS configuration"), Line::SectionHeader { scoped: false });
        assert_eq!(classify("DNS configuration  \t"), Line::SectionHeader { scoped: false });
        assert_eq!(
            classify("DNS configuration (for scoped queries)"),
            Line::SectionHeader { scoped: true }
        );
    }

    #[test]
    fn malformed_section_header_is_a_field() {
        assert_eq!(
            classify("DNS configuration (for everything)"),
            Line::Field("DNS configuration (for everything)")
        );
    }

    #[test]
    fn resolver_headers() {
        assert_eq!(classify("resolver #1"), Line::ResolverHeader { index: 1 });
        assert_eq!(classify("  resolver #12"), Line::ResolverHeader { index: 12 });
        assert_eq!(classify("resolver #"), Line::Field("resolver #"));
        assert_eq!(classify("resolver #1a"), Line::Field("resolver #1a"));
        assert_eq!(classify("resolver #-1"), Line::Field("resolver #-1"));
    }

    #[test]
    fn blank_lines_are_separators() {
        assert_eq!(classify(""), Line::Separator);
        assert_eq!(classify("   \t"), Line::Separator);
    }

    #[test]
    fn field_lines_lose_indentation() {
        assert_eq!(
            classify("  nameserver[0] : 10.0.0.1"),
            Line::Field("nameserver[0] : 10.0.0.1")
        );
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let classified: Vec<_> = lines("DNS configuration\n\nresolver #1\n").collect();
        assert_eq!(
            classified,
            vec![
                (1, Line::SectionHeader { scoped: false }),
                (2, Line::Separator),
                (3, Line::ResolverHeader { index: 1 }),
            ]
        );
    }

    #[test]
    fn crlf_input() {
        let classified: Vec<_> = lines("resolver #1\r\n  order : 1\r\n").map(|(_, l)| l).collect();
        assert_eq!(
            classified,
            vec![Line::ResolverHeader { index: 1 }, Line::Field("order : 1")]
        );
    }
}
