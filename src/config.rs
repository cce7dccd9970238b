//! Parser options.

use crate::error::{DumpError, Result};

/// Default slot limit for indexed fields.
pub const DEFAULT_MAX_SLOTS: usize = 1024;

/// Options controlling how a dump is decoded.
///
/// # Example
///
/// ```
/// use scutil_dns::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_not_reachable_as_flag(true)
///     .with_max_slots(16);
///
/// assert!(options.not_reachable_as_flag);
/// assert_eq!(options.max_slots, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep `Not Reachable` from a `reach` line as a literal flag.
    ///
    /// Off by default: `Not Reachable` marks the absence of reachability
    /// attributes and decodes to an empty flag set.
    pub not_reachable_as_flag: bool,

    /// Slot limit for `nameserver[i]` / `search domain[i]`: `i` must be below it.
    /// Lines above it are reported as malformed and skipped.
    pub max_slots: usize,
}

impl ParseOptions {
    /// Creates options with the default policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            not_reachable_as_flag: false,
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }

    /// Overrides the `Not Reachable` policy.
    #[must_use]
    pub const fn with_not_reachable_as_flag(mut self, keep: bool) -> Self {
        self.not_reachable_as_flag = keep;
        self
    }

    /// Overrides the indexed-field slot limit.
    #[must_use]
    pub const fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots;
        self
    }

    /// Checks that the options can drive a parse.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] if `max_slots` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_slots == 0 {
            return Err(DumpError::InvalidArgument(
                "max_slots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
