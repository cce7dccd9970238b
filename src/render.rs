//! Renders documents back into the `scutil --dns` layout.
//!
//! The output re-parses to the same sections. Set-valued fields come out
//! in sorted order, and a reach value without symbols is written as
//! `(Not Reachable)`.

use std::fmt::{self, Display, Formatter};

use crate::document::{Document, Section};
use crate::field::FieldName;
use crate::line::{RESOLVER_PREFIX, SCOPED_SECTION_HEADER, SECTION_HEADER};
use crate::record::{InterfaceIndex, NOT_REACHABLE, Reach, ResolverRecord};

/// Writes `  key      : value`, padding the key like scutil does.
fn field(f: &mut Formatter<'_>, key: impl Display, value: impl Display) -> fmt::Result {
    writeln!(f, "  {:<8} : {value}", key.to_string())
}

fn indexed(f: &mut Formatter<'_>, name: FieldName, slots: &[Option<String>]) -> fmt::Result {
    for (i, value) in slots.iter().enumerate() {
        if let Some(value) = value {
            field(f, format_args!("{name}[{i}]"), value)?;
        }
    }
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>, separator: &str) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

impl Display for InterfaceIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.index, &self.name) {
            (Some(index), Some(name)) => write!(f, "{index} ({name})"),
            (Some(index), None) => write!(f, "{index}"),
            (None, Some(name)) => write!(f, "({name})"),
            (None, None) => Ok(()),
        }
    }
}

impl Display for Reach {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(mask) = self.mask {
            write!(f, "0x{mask:08x} ")?;
        }
        if self.flags.is_empty() {
            write!(f, "({NOT_REACHABLE})")
        } else {
            write!(f, "({})", join(&self.flags, ","))
        }
    }
}

impl Display for ResolverRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RESOLVER_PREFIX}{}", self.index)?;
        indexed(f, FieldName::SearchDomain, &self.search_domains)?;
        if let Some(domain) = &self.domain {
            field(f, FieldName::Domain, domain)?;
        }
        indexed(f, FieldName::Nameserver, &self.nameservers)?;
        if !self.options.is_empty() {
            field(f, FieldName::Options, join(&self.options, " "))?;
        }
        if let Some(timeout) = self.timeout {
            field(f, FieldName::Timeout, timeout)?;
        }
        if let Some(if_index) = &self.if_index {
            field(f, FieldName::IfIndex, if_index)?;
        }
        if !self.flags.is_empty() {
            field(f, FieldName::Flags, join(&self.flags, ", "))?;
        }
        if let Some(reach) = &self.reach {
            field(f, FieldName::Reach, reach)?;
        }
        if let Some(order) = self.order {
            field(f, FieldName::Order, order)?;
        }
        Ok(())
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let header = if self.is_scoped() {
            SCOPED_SECTION_HEADER
        } else {
            SECTION_HEADER
        };
        writeln!(f, "{header}")?;
        for record in self {
            writeln!(f)?;
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, section) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        let record = ResolverRecord::new(1)
            .with_search_domain("subdomain.example.com")
            .with_nameserver("10.0.0.1")
            .with_if_index(InterfaceIndex::new(15).with_name("en0"))
            .with_flag("Request A records")
            .with_flag("Request AAAA records")
            .with_reach(Reach::new(Some(0x0002_0002), ["Reachable"]));

        assert_eq!(
            record.to_string(),
            "resolver #1\n\
             \x20 search domain[0] : subdomain.example.com\n\
             \x20 nameserver[0] : 10.0.0.1\n\
             \x20 if_index : 15 (en0)\n\
             \x20 flags    : Request A records, Request AAAA records\n\
             \x20 reach    : 0x00020002 (Reachable)\n"
        );
    }

    #[test]
    fn empty_reach_renders_not_reachable() {
        assert_eq!(Reach::new(Some(0), Vec::<String>::new()).to_string(), "0x00000000 (Not Reachable)");
        assert_eq!(Reach::new(None, ["Reachable"]).to_string(), "(Reachable)");
    }

    #[test]
    fn interface_index_halves() {
        assert_eq!(InterfaceIndex::new(4).to_string(), "4");
        assert_eq!(
            InterfaceIndex {
                index: None,
                name: Some("en1".into())
            }
            .to_string(),
            "(en1)"
        );
        assert_eq!(InterfaceIndex::default().to_string(), "");
    }

    #[test]
    fn gaps_are_skipped() {
        let record = ResolverRecord {
            nameservers: vec![None, Some("10.0.0.2".into())],
            ..ResolverRecord::new(2)
        };
        assert_eq!(record.to_string(), "resolver #2\n  nameserver[1] : 10.0.0.2\n");
    }

    #[test]
    fn sections_are_separated() {
        let doc = Document::new(vec![
            Section::new(false, vec![ResolverRecord::new(1).with_order(1)]),
            Section::new(true, vec![ResolverRecord::new(1).with_flag("Scoped")]),
        ]);
        assert_eq!(
            doc.to_string(),
            "DNS configuration\n\nresolver #1\n  order    : 1\n\n\
             DNS configuration (for scoped queries)\n\nresolver #1\n  flags    : Scoped\n"
        );
    }
}
