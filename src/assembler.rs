//! Assembles classified lines into sections and resolver records.
//!
//! ```text
//! AwaitingSection ──section──▶ InSection ──resolver──▶ InResolver
//!        ▲                        ▲  │                  │   ▲  │
//!        │                        │  └──section──┐      │   └──┘ resolver
//!        └── (start)              └──────────────┴──────┘ section
//! ```
//!
//! A record closes at the next resolver header, the next section header,
//! or end of input. Blank lines never close anything.

use crate::anomaly::{Anomaly, AnomalyKind};
use crate::config::ParseOptions;
use crate::document::{Document, Section};
use crate::field::{self, Decoded, Field, FieldName};
use crate::line::{self, Line};
use crate::record::{ResolverRecord, empty_slots, set_slot};

/// A section still receiving records.
struct OpenSection {
    scoped: bool,
    records: Vec<ResolverRecord>,
    last_index: usize,
}

/// A record still receiving fields, with the line of its header.
struct OpenRecord {
    record: ResolverRecord,
    line: usize,
    header: String,
}

enum State {
    AwaitingSection,
    InSection(OpenSection),
    InResolver(OpenSection, OpenRecord),
}

/// Single-pass dump assembler.
///
/// Feed lines in order with [`feed`](Self::feed), then call
/// [`finish`](Self::finish). Stopping early and finishing yields every
/// record seen so far, each complete.
pub struct Assembler<'o> {
    options: &'o ParseOptions,
    state: State,
    sections: Vec<Section>,
    anomalies: Vec<Anomaly>,
}

impl<'o> Assembler<'o> {
    #[must_use]
    pub const fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            state: State::AwaitingSection,
            sections: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    /// Assembles a whole in-memory dump.
    #[must_use]
    pub fn assemble(input: &str, options: &'o ParseOptions) -> Document {
        let mut assembler = Self::new(options);
        for (number, raw) in input.lines().enumerate() {
            assembler.feed(number + 1, raw);
        }
        assembler.finish()
    }

    /// Processes one raw line; `number` is its 1-based line number.
    pub fn feed(&mut self, number: usize, raw: &str) {
        match line::classify(raw) {
            Line::SectionHeader { scoped } => {
                self.close_section();
                tracing::debug!(line = number, scoped, "Opened DNS configuration section");
                self.state = State::InSection(OpenSection {
                    scoped,
                    records: Vec::new(),
                    last_index: 0,
                });
            }
            Line::ResolverHeader { index } => self.open_record(number, raw.trim(), index),
            Line::Separator => {}
            Line::Field(text) => self.apply_field(number, text),
        }
    }

    /// Closes any open record and section and returns the document.
    #[must_use]
    pub fn finish(mut self) -> Document {
        self.close_section();
        let document = Document::from_parts(self.sections, self.anomalies);
        tracing::debug!(
            sections = document.len(),
            records = document.records().count(),
            anomalies = document.anomalies().len(),
            "Parsed DNS configuration dump"
        );
        document
    }

    fn open_record(&mut self, number: usize, header: &str, index: usize) {
        let mut section = match std::mem::replace(&mut self.state, State::AwaitingSection) {
            State::AwaitingSection => {
                self.note(number, None, header, AnomalyKind::OrphanResolver);
                return;
            }
            State::InSection(section) => section,
            State::InResolver(mut section, open) => {
                self.close_record(&mut section, open);
                section
            }
        };

        let expected = section.last_index.checked_add(1);
        if expected != Some(index) {
            self.note(
                number,
                None,
                header,
                AnomalyKind::ResolverIndexMismatch {
                    expected,
                    found: index,
                },
            );
        }
        section.last_index = index;
        tracing::debug!(line = number, index, "Opened resolver");

        self.state = State::InResolver(
            section,
            OpenRecord {
                record: ResolverRecord::new(index),
                line: number,
                header: header.to_string(),
            },
        );
    }

    fn apply_field(&mut self, number: usize, text: &str) {
        let State::InResolver(_, open) = &mut self.state else {
            self.note(number, None, text, AnomalyKind::OrphanField);
            return;
        };

        match field::decode(text, self.options) {
            Decoded::Unrecognized { key, kind } => {
                self.note(number, key, text, kind);
            }
            Decoded::Field { field, issue } => {
                let name = field.name();
                let duplicate = merge(&mut open.record, field);
                for kind in issue.into_iter().chain(duplicate) {
                    self.note(number, Some(name.key().to_string()), text, kind);
                }
            }
        }
    }

    fn close_record(&mut self, section: &mut OpenSection, open: OpenRecord) {
        let OpenRecord {
            record,
            line,
            header,
        } = open;

        let gaps: Vec<_> = empty_slots(&record.search_domains)
            .map(|slot| (FieldName::SearchDomain, slot))
            .chain(empty_slots(&record.nameservers).map(|slot| (FieldName::Nameserver, slot)))
            .collect();
        for (field, slot) in gaps {
            self.note(
                line,
                Some(field.key().to_string()),
                &header,
                AnomalyKind::IndexGap { field, slot },
            );
        }
        if record.is_empty() {
            self.note(line, None, &header, AnomalyKind::EmptyResolver);
        }

        tracing::debug!(line, index = record.index, "Closed resolver");
        section.records.push(record);
    }

    fn close_section(&mut self) {
        let section = match std::mem::replace(&mut self.state, State::AwaitingSection) {
            State::AwaitingSection => return,
            State::InSection(section) => section,
            State::InResolver(mut section, open) => {
                self.close_record(&mut section, open);
                section
            }
        };
        tracing::debug!(
            scoped = section.scoped,
            records = section.records.len(),
            "Closed DNS configuration section"
        );
        self.sections.push(Section::new(section.scoped, section.records));
    }

    fn note(&mut self, line: usize, key: Option<String>, text: &str, kind: AnomalyKind) {
        tracing::debug!(line, key = key.as_deref(), kind = %kind, "Dump anomaly");
        self.anomalies.push(Anomaly {
            line,
            key,
            text: text.to_string(),
            kind,
        });
    }
}

/// Merges a decoded field into `record`.
///
/// Returns a [`AnomalyKind::DuplicateIndex`] when an indexed slot is
/// overwritten.
fn merge(record: &mut ResolverRecord, field: Field) -> Option<AnomalyKind> {
    match field {
        Field::SearchDomain { index, value } => set_slot(&mut record.search_domains, index, value)
            .then_some(AnomalyKind::DuplicateIndex {
                field: FieldName::SearchDomain,
                slot: index,
            }),
        Field::Nameserver { index, value } => set_slot(&mut record.nameservers, index, value)
            .then_some(AnomalyKind::DuplicateIndex {
                field: FieldName::Nameserver,
                slot: index,
            }),
        Field::Domain(domain) => {
            record.domain = Some(domain);
            None
        }
        Field::Options(options) => {
            record.options.extend(options);
            None
        }
        Field::Timeout(seconds) => {
            record.timeout = Some(seconds);
            None
        }
        Field::IfIndex(if_index) => {
            record.if_index = Some(if_index);
            None
        }
        Field::Flags(flags) => {
            record.flags.extend(flags);
            None
        }
        Field::Reach(reach) => {
            record.reach = Some(reach);
            None
        }
        Field::Order(order) => {
            record.order = Some(order);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Document {
        Assembler::assemble(input, &ParseOptions::default())
    }

    fn kinds(doc: &Document) -> Vec<AnomalyKind> {
        doc.anomalies().iter().map(|a| a.kind.clone()).collect()
    }

    #[test]
    fn blank_lines_do_not_close_records() {
        let doc = parse("DNS configuration\n\nresolver #1\n  domain : local\n\n  order : 5\n");
        let record = &doc.sections()[0].records()[0];
        assert_eq!(record.domain.as_deref(), Some("local"));
        assert_eq!(record.order, Some(5));
        assert!(!doc.has_anomalies());
    }

    #[test]
    fn section_header_closes_record() {
        let doc = parse(
            "DNS configuration\nresolver #1\n  order : 1\nDNS configuration (for scoped queries)\n  order : 2\nresolver #1\n  order : 3\n",
        );
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.sections()[0].records()[0].order, Some(1));
        assert_eq!(doc.sections()[1].records()[0].order, Some(3));
        assert_eq!(kinds(&doc), vec![AnomalyKind::OrphanField]);
        assert_eq!(doc.anomalies()[0].line, 5);
    }

    #[test]
    fn out_of_order_indices_fill_in() {
        let doc = parse(
            "DNS configuration\nresolver #1\n  nameserver[1] : 10.0.0.2\n  nameserver[0] : 10.0.0.1\n",
        );
        let record = &doc.sections()[0].records()[0];
        assert_eq!(
            record.nameservers,
            vec![Some("10.0.0.1".to_string()), Some("10.0.0.2".to_string())]
        );
        assert!(!doc.has_anomalies());
    }

    #[test]
    fn out_of_order_search_domains_fill_in() {
        let doc = parse(
            "DNS configuration\nresolver #1\n  search domain[1] : example.com\n  search domain[0] : corp.example.com\n",
        );
        let record = &doc.sections()[0].records()[0];
        assert_eq!(
            record.search_domains,
            vec![
                Some("corp.example.com".to_string()),
                Some("example.com".to_string())
            ]
        );
        assert!(!doc.has_anomalies());
    }

    #[test]
    fn largest_resolver_ordinal_does_not_overflow() {
        let doc = parse(&format!(
            "DNS configuration\n\nresolver #{}\n  order : 1\n\nresolver #1\n  order : 2\n",
            usize::MAX
        ));
        let section = &doc.sections()[0];
        assert_eq!(section.len(), 2);
        assert_eq!(section.records()[0].index, usize::MAX);
        assert_eq!(section.records()[1].order, Some(2));
        assert_eq!(
            kinds(&doc),
            vec![
                AnomalyKind::ResolverIndexMismatch {
                    expected: Some(1),
                    found: usize::MAX
                },
                AnomalyKind::ResolverIndexMismatch {
                    expected: None,
                    found: 1
                },
            ]
        );
        assert_eq!(doc.anomalies()[1].line, 6);
    }

    #[test]
    fn empty_set_fields_are_not_collected() {
        let doc = parse("DNS configuration\nresolver #1\n  flags :\n  options : ,\n");
        assert_eq!(
            kinds(&doc),
            vec![
                AnomalyKind::EmptyValue,
                AnomalyKind::EmptyValue,
                AnomalyKind::EmptyResolver
            ]
        );
        assert_eq!(doc.anomalies()[0].key.as_deref(), Some("flags"));
        assert_eq!(doc.anomalies()[1].key.as_deref(), Some("options"));
    }

    #[test]
    fn duplicate_index_keeps_last() {
        let doc = parse(
            "DNS configuration\nresolver #1\n  search domain[0] : a.example\n  search domain[0] : b.example\n",
        );
        let record = &doc.sections()[0].records()[0];
        assert_eq!(record.search_domains, vec![Some("b.example".to_string())]);
        assert_eq!(
            kinds(&doc),
            vec![AnomalyKind::DuplicateIndex {
                field: FieldName::SearchDomain,
                slot: 0
            }]
        );
        assert_eq!(doc.anomalies()[0].line, 4);
    }

    #[test]
    fn flags_and_options_union() {
        let doc = parse(
            "DNS configuration\nresolver #1\n  flags : Scoped\n  flags : Request A records\n  options : mdns\n  options : rotate\n",
        );
        let record = &doc.sections()[0].records()[0];
        assert_eq!(record.flags.len(), 2);
        assert!(record.options.contains("mdns") && record.options.contains("rotate"));
    }

    #[test]
    fn scalars_overwrite() {
        let doc = parse("DNS configuration\nresolver #1\n  timeout : 5\n  timeout : 7\n");
        assert_eq!(doc.sections()[0].records()[0].timeout, Some(7));
    }

    #[test]
    fn bad_integer_keeps_prior_value() {
        let doc = parse("DNS configuration\nresolver #1\n  order : 10\n  order : ten\n");
        assert_eq!(doc.sections()[0].records()[0].order, Some(10));
        assert_eq!(kinds(&doc), vec![AnomalyKind::InvalidInteger]);
        assert_eq!(doc.anomalies()[0].key.as_deref(), Some("order"));
    }

    #[test]
    fn mismatched_resolver_index() {
        let doc = parse("DNS configuration\nresolver #1\n  order : 1\nresolver #3\n  order : 3\n");
        let section = &doc.sections()[0];
        assert_eq!(section.len(), 2);
        assert_eq!(section.records()[1].index, 3);
        assert_eq!(
            kinds(&doc),
            vec![AnomalyKind::ResolverIndexMismatch {
                expected: Some(2),
                found: 3
            }]
        );
    }

    #[test]
    fn empty_resolver_is_kept() {
        let doc = parse("DNS configuration\nresolver #1\n\nresolver #2\n  order : 1\n");
        assert_eq!(doc.sections()[0].len(), 2);
        assert!(doc.sections()[0].records()[0].is_empty());
        assert_eq!(kinds(&doc), vec![AnomalyKind::EmptyResolver]);
        assert_eq!(doc.anomalies()[0].line, 2);
    }

    #[test]
    fn orphans_before_first_section() {
        let doc = parse("resolver #1\n  order : 1\n");
        assert!(doc.is_empty());
        assert_eq!(
            kinds(&doc),
            vec![AnomalyKind::OrphanResolver, AnomalyKind::OrphanField]
        );
    }

    #[test]
    fn unknown_keys_do_not_abort() {
        let doc = parse("DNS configuration\nresolver #1\n  port : 53\n  order : 1\n");
        assert_eq!(doc.sections()[0].records()[0].order, Some(1));
        let anomaly = &doc.anomalies()[0];
        assert_eq!(anomaly.kind, AnomalyKind::UnknownKey);
        assert_eq!(anomaly.key.as_deref(), Some("port"));
        assert_eq!(anomaly.text, "port : 53");
        assert_eq!(anomaly.line, 3);
    }

    #[test]
    fn early_finish_keeps_complete_records() {
        let options = ParseOptions::default();
        let mut assembler = Assembler::new(&options);
        for (i, raw) in ["DNS configuration", "resolver #1", "  order : 1", "resolver #2"]
            .into_iter()
            .enumerate()
        {
            assembler.feed(i + 1, raw);
        }
        let doc = assembler.finish();
        assert_eq!(doc.sections()[0].records()[0].order, Some(1));
        assert_eq!(doc.sections()[0].len(), 2);
    }
}
