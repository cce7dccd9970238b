//! Non-fatal observations collected while parsing.

use std::fmt;

use crate::field::FieldName;

/// What was wrong with a line or record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AnomalyKind {
    /// Field line without a `key : value` separator.
    MissingSeparator,
    /// Key not understood by this decoder.
    UnknownKey,
    /// `[i]` that is not a number, or is above the configured slot limit.
    InvalidIndex,
    /// Integer field whose value does not parse.
    InvalidInteger,
    /// `reach` mask that is not a 32-bit hex literal.
    InvalidMask,
    /// Value that is required to be non-empty but is empty.
    EmptyValue,
    /// An indexed field left a slot unfilled.
    IndexGap {
        /// The indexed field.
        field: FieldName,
        /// The empty slot.
        slot: usize,
    },
    /// An indexed field slot was written more than once; the last value wins.
    DuplicateIndex {
        /// The indexed field.
        field: FieldName,
        /// The overwritten slot.
        slot: usize,
    },
    /// `resolver #N` did not follow the previous ordinal in its section.
    ResolverIndexMismatch {
        /// Ordinal the sequence called for; `None` when the previous
        /// ordinal has no successor.
        expected: Option<usize>,
        /// Ordinal the header declared.
        found: usize,
    },
    /// A resolver block without any fields.
    EmptyResolver,
    /// A field line outside any resolver block.
    OrphanField,
    /// A resolver header before any section header.
    OrphanResolver,
}

impl AnomalyKind {
    /// Returns `true` for problems with the dump's structure rather than
    /// with a single line's content.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::IndexGap { .. }
                | Self::DuplicateIndex { .. }
                | Self::ResolverIndexMismatch { .. }
                | Self::EmptyResolver
                | Self::OrphanField
                | Self::OrphanResolver
        )
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("missing `:` separator"),
            Self::UnknownKey => f.write_str("unknown key"),
            Self::InvalidIndex => f.write_str("invalid index"),
            Self::InvalidInteger => f.write_str("invalid integer"),
            Self::InvalidMask => f.write_str("invalid reach mask"),
            Self::EmptyValue => f.write_str("empty value"),
            Self::IndexGap { field, slot } => write!(f, "{field}[{slot}] missing"),
            Self::DuplicateIndex { field, slot } => write!(f, "{field}[{slot}] repeated"),
            Self::ResolverIndexMismatch {
                expected: Some(expected),
                found,
            } => write!(f, "resolver #{found} where #{expected} was expected"),
            Self::ResolverIndexMismatch {
                expected: None,
                found,
            } => write!(f, "resolver #{found} after the largest ordinal"),
            Self::EmptyResolver => f.write_str("resolver has no fields"),
            Self::OrphanField => f.write_str("field outside a resolver"),
            Self::OrphanResolver => f.write_str("resolver outside a section"),
        }
    }
}

/// A non-fatal observation tied to a line of the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Anomaly {
    /// 1-based line number. For record-level findings, the resolver header.
    pub line: usize,
    /// The field key involved, when one was recognised.
    pub key: Option<String>,
    /// The offending line, without indentation.
    pub text: String,
    /// The finding.
    pub kind: AnomalyKind,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {:?}", self.line, self.kind, self.text)
    }
}
