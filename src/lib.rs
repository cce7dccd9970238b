//! # scutil-dns
//!
//! Parse the resolver configuration dump printed by macOS `scutil --dns`
//! into typed, queryable data.
//!
//! The dump is diagnostic text with structure implied by headers and
//! indentation:
//!
//! ```text
//! DNS configuration
//!
//! resolver #1
//!   search domain[0] : subdomain.example.com
//!   nameserver[0] : 10.0.0.1
//!   if_index : 15 (en0)
//!   flags    : Request A records, Request AAAA records
//!   reach    : 0x00020002 (Reachable,Directly Reachable Address)
//!
//! DNS configuration (for scoped queries)
//!
//! resolver #1
//!   ...
//! ```
//!
//! ## Quick start
//!
//! ```
//! use scutil_dns::Document;
//!
//! let dump = "DNS configuration\n\nresolver #1\n  nameserver[0] : 10.0.0.1\n  if_index : 15 (en0)\n";
//! let doc = Document::parse(dump);
//!
//! let resolver = &doc.sections()[0].records()[0];
//! assert_eq!(resolver.nameservers, vec![Some("10.0.0.1".to_string())]);
//! assert_eq!(resolver.interface_name(), Some("en0"));
//! assert!(!doc.has_anomalies());
//! ```
//!
//! ## Anomalies, not errors
//!
//! Parsing always completes. Unknown keys, malformed values, gaps in
//! indexed fields and out-of-sequence resolver numbers are collected as
//! [`Anomaly`] entries on the [`Document`]; the caller decides whether
//! they matter. [`DumpError`] is reserved for invalid invocations
//! (non-UTF-8 input, unusable [`ParseOptions`]) and I/O failures.
//!
//! ## Open vocabularies
//!
//! `flags`, `options` and `reach` symbols are kept as string sets, so
//! symbols introduced by newer macOS releases survive parsing. A reach
//! decode of `Not Reachable` becomes an empty set unless
//! [`ParseOptions::not_reachable_as_flag`] is set.
//!
//! ## Obtaining a dump
//!
//! This crate does not run `scutil`. Capture the text yourself, e.g.:
//!
//! ```bash
//! scutil --dns > dns.txt
//! ```
//!
//! and hand it to [`Document::from_path`], [`Document::from_reader`] or
//! [`Document::parse`].

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anomaly;
pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod line;
pub mod record;
mod render;
pub mod util;

pub use anomaly::{Anomaly, AnomalyKind};
pub use config::ParseOptions;
pub use document::{Document, Section};
pub use error::{DumpError, Result};
pub use field::FieldName;
pub use record::{
    FLAG_REQUEST_A, FLAG_REQUEST_AAAA, FLAG_SCOPED, InterfaceIndex, NOT_REACHABLE, Reach,
    ResolverRecord,
};
