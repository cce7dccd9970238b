//! Field line decoding.
//!
//! A field line is `key : value`, where `key` may carry an index
//! (`nameserver[1]`). The value's syntax depends on the key:
//!
//! | key                 | value                                   |
//! |---------------------|-----------------------------------------|
//! | `search domain[i]`  | domain name                             |
//! | `nameserver[i]`     | IPv4 or IPv6 address                    |
//! | `domain`            | domain name                             |
//! | `options`           | tokens separated by spaces or commas    |
//! | `timeout`, `order`  | unsigned integer                        |
//! | `if_index`          | `15 (en0)`; either half may be missing  |
//! | `flags`             | comma-separated symbols                 |
//! | `reach`             | `0x00020002 (Reachable,...)`            |
//!
//! Decoding never fails outright: unusable lines come back as
//! [`Decoded::Unrecognized`] so the caller can skip them.

use std::collections::BTreeSet;
use std::fmt;

use crate::anomaly::AnomalyKind;
use crate::config::ParseOptions;
use crate::record::{InterfaceIndex, NOT_REACHABLE, Reach};
use crate::util::{parse_hex_u32, split_parenthetical, split_tokens};

const OPTION_SEPARATORS: &[char] = &[',', ' ', '\t'];

/// The record field a key targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldName {
    SearchDomain,
    Nameserver,
    Domain,
    Options,
    Timeout,
    IfIndex,
    Flags,
    Reach,
    Order,
}

impl FieldName {
    /// The key as written in the dump, without index.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SearchDomain => "search domain",
            Self::Nameserver => "nameserver",
            Self::Domain => "domain",
            Self::Options => "options",
            Self::Timeout => "timeout",
            Self::IfIndex => "if_index",
            Self::Flags => "flags",
            Self::Reach => "reach",
            Self::Order => "order",
        }
    }

    /// Looks up a key (without index).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "search domain" => Self::SearchDomain,
            "nameserver" => Self::Nameserver,
            "domain" => Self::Domain,
            "options" => Self::Options,
            "timeout" => Self::Timeout,
            "if_index" => Self::IfIndex,
            "flags" => Self::Flags,
            "reach" => Self::Reach,
            "order" => Self::Order,
            _ => return None,
        })
    }

    /// Returns `true` for keys written as `name[i]`.
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::SearchDomain | Self::Nameserver)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A decoded field value, tagged with the field it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    SearchDomain { index: usize, value: String },
    Nameserver { index: usize, value: String },
    Domain(String),
    Options(BTreeSet<String>),
    Timeout(u32),
    IfIndex(InterfaceIndex),
    Flags(BTreeSet<String>),
    Reach(Reach),
    Order(u32),
}

impl Field {
    /// The targeted field.
    #[must_use]
    pub const fn name(&self) -> FieldName {
        match self {
            Self::SearchDomain { .. } => FieldName::SearchDomain,
            Self::Nameserver { .. } => FieldName::Nameserver,
            Self::Domain(_) => FieldName::Domain,
            Self::Options(_) => FieldName::Options,
            Self::Timeout(_) => FieldName::Timeout,
            Self::IfIndex(_) => FieldName::IfIndex,
            Self::Flags(_) => FieldName::Flags,
            Self::Reach(_) => FieldName::Reach,
            Self::Order(_) => FieldName::Order,
        }
    }
}

/// Outcome of decoding one field line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The line decoded. `issue` is set when part of the value was
    /// malformed but the rest was still usable (e.g. a bad reach mask).
    Field {
        field: Field,
        issue: Option<AnomalyKind>,
    },
    /// The line could not be used.
    Unrecognized {
        /// The key text, if the line had a separator.
        key: Option<String>,
        kind: AnomalyKind,
    },
}

impl Decoded {
    const fn ok(field: Field) -> Self {
        Self::Field { field, issue: None }
    }

    fn unrecognized(key: &str, kind: AnomalyKind) -> Self {
        Self::Unrecognized {
            key: Some(key.to_string()),
            kind,
        }
    }
}

/// Decodes a field line (indentation already stripped).
///
/// ```
/// use scutil_dns::ParseOptions;
/// use scutil_dns::field::{decode, Decoded, Field};
///
/// let decoded = decode("nameserver[1] : 10.0.0.12", &ParseOptions::default());
/// assert_eq!(
///     decoded,
///     Decoded::Field {
///         field: Field::Nameserver { index: 1, value: "10.0.0.12".into() },
///         issue: None,
///     }
/// );
/// ```
#[must_use]
pub fn decode(line: &str, options: &ParseOptions) -> Decoded {
    // Keys never contain ':', IPv6 values do.
    let Some((key, value)) = line.split_once(':') else {
        return Decoded::Unrecognized {
            key: None,
            kind: AnomalyKind::MissingSeparator,
        };
    };
    let key = key.trim();
    let value = value.trim();

    let (base, index) = match split_index(key) {
        Ok(parts) => parts,
        Err(kind) => return Decoded::unrecognized(key, kind),
    };
    let Some(name) = FieldName::from_key(base) else {
        return Decoded::unrecognized(key, AnomalyKind::UnknownKey);
    };

    match (name.is_indexed(), index) {
        (true, Some(index)) => decode_indexed(key, name, index, value, options),
        (false, None) => decode_plain(key, name, value, options),
        _ => Decoded::unrecognized(key, AnomalyKind::UnknownKey),
    }
}

/// Splits `name[i]` into `("name", Some(i))`; plain keys pass through.
fn split_index(key: &str) -> Result<(&str, Option<usize>), AnomalyKind> {
    let Some(open) = key.strip_suffix(']') else {
        return Ok((key, None));
    };
    let (base, index) = open.rsplit_once('[').ok_or(AnomalyKind::InvalidIndex)?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| AnomalyKind::InvalidIndex)?;
    Ok((base.trim_end(), Some(index)))
}

fn decode_indexed(
    key: &str,
    name: FieldName,
    index: usize,
    value: &str,
    options: &ParseOptions,
) -> Decoded {
    if index >= options.max_slots {
        return Decoded::unrecognized(key, AnomalyKind::InvalidIndex);
    }
    if value.is_empty() {
        return Decoded::unrecognized(key, AnomalyKind::EmptyValue);
    }
    let value = value.to_string();
    Decoded::ok(match name {
        FieldName::SearchDomain => Field::SearchDomain { index, value },
        _ => Field::Nameserver { index, value },
    })
}

fn decode_plain(key: &str, name: FieldName, value: &str, options: &ParseOptions) -> Decoded {
    match name {
        FieldName::Domain if value.is_empty() => {
            Decoded::unrecognized(key, AnomalyKind::EmptyValue)
        }
        FieldName::Domain => Decoded::ok(Field::Domain(value.to_string())),
        FieldName::Options => match collect(value, OPTION_SEPARATORS) {
            options if options.is_empty() => Decoded::unrecognized(key, AnomalyKind::EmptyValue),
            options => Decoded::ok(Field::Options(options)),
        },
        FieldName::Flags => match collect(value, &[',']) {
            flags if flags.is_empty() => Decoded::unrecognized(key, AnomalyKind::EmptyValue),
            flags => Decoded::ok(Field::Flags(flags)),
        },
        FieldName::Timeout => value.parse().map_or_else(
            |_| Decoded::unrecognized(key, AnomalyKind::InvalidInteger),
            |seconds| Decoded::ok(Field::Timeout(seconds)),
        ),
        FieldName::Order => value.parse().map_or_else(
            |_| Decoded::unrecognized(key, AnomalyKind::InvalidInteger),
            |order| Decoded::ok(Field::Order(order)),
        ),
        FieldName::IfIndex => decode_if_index(value),
        FieldName::Reach => decode_reach(value, options),
        FieldName::SearchDomain | FieldName::Nameserver => {
            Decoded::unrecognized(key, AnomalyKind::UnknownKey)
        }
    }
}

fn decode_if_index(value: &str) -> Decoded {
    let (number, name) = split_parenthetical(value);
    let index: Result<Option<u32>, _> = if number.is_empty() {
        Ok(None)
    } else {
        number.parse().map(Some)
    };
    let if_index = InterfaceIndex {
        index: index.as_ref().ok().copied().flatten(),
        name: name.filter(|n| !n.is_empty()).map(str::to_string),
    };
    Decoded::Field {
        field: Field::IfIndex(if_index),
        issue: index.err().map(|_| AnomalyKind::InvalidInteger),
    }
}

fn decode_reach(value: &str, options: &ParseOptions) -> Decoded {
    let (mask_text, symbols) = split_parenthetical(value);
    let mask = parse_hex_u32(mask_text);
    let flags = symbols
        .map(|s| {
            split_tokens(s, &[','])
                .filter(|flag| options.not_reachable_as_flag || *flag != NOT_REACHABLE)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Decoded::Field {
        field: Field::Reach(Reach { mask, flags }),
        issue: (mask.is_none() && !mask_text.is_empty()).then_some(AnomalyKind::InvalidMask),
    }
}

fn collect(value: &str, separators: &[char]) -> BTreeSet<String> {
    split_tokens(value, separators).map(str::to_string).collect()
}
