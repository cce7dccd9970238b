//! Resolver records and their value types.

use std::collections::BTreeSet;
use std::net::IpAddr;

/// `flags` symbol: the resolver issues A queries.
pub const FLAG_REQUEST_A: &str = "Request A records";

/// `flags` symbol: the resolver issues AAAA queries.
pub const FLAG_REQUEST_AAAA: &str = "Request AAAA records";

/// `flags` symbol: the resolver only answers scoped queries.
pub const FLAG_SCOPED: &str = "Scoped";

/// `reach` symbol marking that no reachability attribute is set.
pub const NOT_REACHABLE: &str = "Not Reachable";

/// `reach` symbol for a reachable server.
pub const REACHABLE: &str = "Reachable";

/// Bit of the reach mask meaning "reachable".
pub const REACHABLE_BIT: u32 = 1 << 1;

/// Interface a resolver is bound to (`if_index : 15 (en0)`).
///
/// Either half may be missing from the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterfaceIndex {
    /// Numeric interface index.
    pub index: Option<u32>,
    /// Interface name, e.g. `en0`.
    pub name: Option<String>,
}

impl InterfaceIndex {
    /// Creates an interface index without a name.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self {
            index: Some(index),
            name: None,
        }
    }

    /// Sets the interface name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Reachability of a resolver's servers (`reach : 0x00020002 (Reachable,...)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reach {
    /// Raw mask; `None` when the hex text was missing or malformed.
    pub mask: Option<u32>,
    /// Symbolic decode from the parentheses. Open vocabulary.
    pub flags: BTreeSet<String>,
}

impl Reach {
    /// Creates a reach value from a mask and its symbols.
    #[must_use]
    pub fn new<I, S>(mask: Option<u32>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mask,
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the mask has the reachable bit, or, without a
    /// mask, if the symbols say `Reachable`.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.mask.map_or_else(
            || self.flags.contains(REACHABLE),
            |mask| mask & REACHABLE_BIT != 0,
        )
    }
}

/// One `resolver #N` block.
///
/// Every field is optional in the dump; an absent field stays `None` or
/// empty. Indexed fields are stored densely by their declared `[i]`, with
/// `None` in slots the dump never filled.
///
/// # Example
///
/// ```
/// use scutil_dns::{InterfaceIndex, ResolverRecord};
///
/// let record = ResolverRecord::new(1)
///     .with_nameserver("10.0.0.1")
///     .with_if_index(InterfaceIndex::new(15).with_name("en0"))
///     .with_flag(scutil_dns::FLAG_REQUEST_A);
///
/// assert!(record.requests_a());
/// assert_eq!(record.nameservers, vec![Some("10.0.0.1".to_string())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolverRecord {
    /// Declared ordinal from `resolver #N`.
    pub index: usize,
    /// `search domain[i]` values.
    pub search_domains: Vec<Option<String>>,
    /// `nameserver[i]` values, in textual address form.
    pub nameservers: Vec<Option<String>>,
    /// `domain` the resolver is responsible for.
    pub domain: Option<String>,
    /// `options` tokens, e.g. `mdns`.
    pub options: BTreeSet<String>,
    /// `timeout` in seconds.
    pub timeout: Option<u32>,
    /// `if_index` binding.
    pub if_index: Option<InterfaceIndex>,
    /// `flags` symbols.
    pub flags: BTreeSet<String>,
    /// `reach` state.
    pub reach: Option<Reach>,
    /// `order`; lower values take precedence.
    pub order: Option<u32>,
}

impl ResolverRecord {
    /// Creates an empty record with the given declared ordinal.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Appends a search domain after the last slot.
    #[must_use]
    pub fn with_search_domain(mut self, domain: impl Into<String>) -> Self {
        self.search_domains.push(Some(domain.into()));
        self
    }

    /// Appends a nameserver after the last slot.
    #[must_use]
    pub fn with_nameserver(mut self, address: impl Into<String>) -> Self {
        self.nameservers.push(Some(address.into()));
        self
    }

    /// Sets the domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Adds an option token.
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.insert(option.into());
        self
    }

    /// Sets the timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Sets the interface binding.
    #[must_use]
    pub fn with_if_index(mut self, if_index: InterfaceIndex) -> Self {
        self.if_index = Some(if_index);
        self
    }

    /// Adds a flag symbol.
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// Sets the reach state.
    #[must_use]
    pub fn with_reach(mut self, reach: Reach) -> Self {
        self.reach = Some(reach);
        self
    }

    /// Sets the order.
    #[must_use]
    pub const fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns `true` if no field was collected for this record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_domains.is_empty()
            && self.nameservers.is_empty()
            && self.domain.is_none()
            && self.options.is_empty()
            && self.timeout.is_none()
            && self.if_index.is_none()
            && self.flags.is_empty()
            && self.reach.is_none()
            && self.order.is_none()
    }

    /// Returns `true` if `flags` contains `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub fn requests_a(&self) -> bool {
        self.has_flag(FLAG_REQUEST_A)
    }

    #[must_use]
    pub fn requests_aaaa(&self) -> bool {
        self.has_flag(FLAG_REQUEST_AAAA)
    }

    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.has_flag(FLAG_SCOPED)
    }

    /// Interface name from `if_index`, if any.
    #[must_use]
    pub fn interface_name(&self) -> Option<&str> {
        self.if_index.as_ref()?.name.as_deref()
    }

    /// Nameservers that parse as IP addresses, in slot order.
    pub fn nameserver_addrs(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.nameservers
            .iter()
            .flatten()
            .filter_map(|ns| ns.parse().ok())
    }
}

/// Stores `value` at `slot`, growing `slots` with empty entries as needed.
///
/// Returns `true` if the slot was already occupied.
pub(crate) fn set_slot(slots: &mut Vec<Option<String>>, slot: usize, value: String) -> bool {
    if slots.len() <= slot {
        slots.resize(slot + 1, None);
    }
    slots[slot].replace(value).is_some()
}

/// Indices of slots the dump never filled.
pub(crate) fn empty_slots(slots: &[Option<String>]) -> impl Iterator<Item = usize> + '_ {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.is_none().then_some(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        let r = ResolverRecord::new(3);
        assert_eq!(r.index, 3);
        assert!(r.is_empty());
        assert!(!ResolverRecord::new(3).with_order(1).is_empty());
    }

    #[test]
    fn flag_helpers() {
        let r = ResolverRecord::new(1)
            .with_flag(FLAG_SCOPED)
            .with_flag(FLAG_REQUEST_AAAA);
        assert!(r.is_scoped());
        assert!(r.requests_aaaa());
        assert!(!r.requests_a());
    }

    #[test]
    fn nameserver_addrs_skip_gaps_and_garbage() {
        let r = ResolverRecord {
            nameservers: vec![None, Some("10.0.0.1".into()), Some("bogus".into()), Some("::1".into())],
            ..ResolverRecord::new(1)
        };
        let addrs: Vec<IpAddr> = r.nameserver_addrs().collect();
        assert_eq!(addrs, vec!["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse().unwrap()]);
    }

    #[test]
    fn set_slot_grows_and_reports_overwrite() {
        let mut slots = Vec::new();
        assert!(!set_slot(&mut slots, 2, "c".into()));
        assert_eq!(slots, vec![None, None, Some("c".to_string())]);
        assert!(!set_slot(&mut slots, 0, "a".into()));
        assert!(set_slot(&mut slots, 0, "z".into()));
        assert_eq!(empty_slots(&slots).collect::<Vec<_>>(), vec![1]);
        assert_eq!(slots[0].as_deref(), Some("z"));
    }

    #[test]
    fn reachability() {
        assert!(Reach::new(Some(0x0002_0002), ["Reachable"]).is_reachable());
        assert!(!Reach::new(Some(0), Vec::<String>::new()).is_reachable());
        assert!(Reach::new(None, [REACHABLE]).is_reachable());
        assert!(!Reach::default().is_reachable());
    }

    #[test]
    fn interface_name() {
        let r = ResolverRecord::new(1).with_if_index(InterfaceIndex::new(15).with_name("en0"));
        assert_eq!(r.interface_name(), Some("en0"));
        assert_eq!(ResolverRecord::new(1).interface_name(), None);
    }
}
