//! Parsed dump: sections of resolver records plus anomalies.

use std::io::BufRead;
use std::path::Path;

use crate::anomaly::Anomaly;
use crate::assembler::Assembler;
use crate::config::ParseOptions;
use crate::error::{DumpError, Result};
use crate::record::ResolverRecord;

/// A `DNS configuration` block and its resolvers, in dump order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Section {
    scoped: bool,
    records: Vec<ResolverRecord>,
}

impl Section {
    #[must_use]
    pub const fn new(scoped: bool, records: Vec<ResolverRecord>) -> Self {
        Self { scoped, records }
    }

    /// `true` for `DNS configuration (for scoped queries)`.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        self.scoped
    }

    #[must_use]
    pub fn records(&self) -> &[ResolverRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolverRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by its declared `resolver #N`.
    #[must_use]
    pub fn resolver(&self, index: usize) -> Option<&ResolverRecord> {
        self.records.iter().find(|r| r.index == index)
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = &'a ResolverRecord;
    type IntoIter = std::slice::Iter<'a, ResolverRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A parsed `scutil --dns` dump.
///
/// Immutable once built. Parsing never fails on content: whatever could
/// not be decoded is listed in [`anomalies`](Self::anomalies).
///
/// # Example
///
/// ```
/// use scutil_dns::Document;
///
/// let doc = Document::parse(
///     "DNS configuration\n\nresolver #1\n  nameserver[0] : 10.0.0.1\n  port : 53\n",
/// );
///
/// assert_eq!(doc.len(), 1);
/// assert_eq!(doc.records().count(), 1);
/// assert_eq!(doc.anomalies().len(), 1); // `port` is not a known key
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    sections: Vec<Section>,
    anomalies: Vec<Anomaly>,
}

impl Document {
    /// Builds a document from sections, with no anomalies.
    #[must_use]
    pub const fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            anomalies: Vec::new(),
        }
    }

    pub(crate) const fn from_parts(sections: Vec<Section>, anomalies: Vec<Anomaly>) -> Self {
        Self {
            sections,
            anomalies,
        }
    }

    /// Parses a dump with the default [`ParseOptions`].
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Assembler::assemble(input, &ParseOptions::default())
    }

    /// Parses a dump with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] if `options` are invalid.
    pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Self> {
        options.validate()?;
        Ok(Assembler::assemble(input, options))
    }

    /// Parses a dump given as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] if `bytes` are not UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &ParseOptions::default())
    }

    /// Parses a dump given as raw bytes, with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] if `bytes` are not UTF-8 or
    /// `options` are invalid.
    pub fn from_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Self> {
        let input = std::str::from_utf8(bytes)
            .map_err(|e| DumpError::InvalidArgument(format!("dump is not valid UTF-8: {e}")))?;
        Self::parse_with(input, options)
    }

    /// Parses a dump line by line from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] on non-UTF-8 input, or
    /// [`DumpError::Io`] if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, &ParseOptions::default())
    }

    /// Parses a dump line by line from a reader, with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::InvalidArgument`] on non-UTF-8 input or invalid
    /// `options`, or [`DumpError::Io`] if reading fails.
    pub fn from_reader_with<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Self> {
        options.validate()?;
        let mut assembler = Assembler::new(options);
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                if e.kind() == std::io::ErrorKind::InvalidData {
                    DumpError::InvalidArgument(format!("line {} is not valid UTF-8", i + 1))
                } else {
                    DumpError::Io(e)
                }
            })?;
            assembler.feed(i + 1, &line);
        }
        Ok(assembler.finish())
    }

    /// Parses a dump saved to a file (e.g. `scutil --dns > dns.txt`).
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Io`] if the file cannot be read, or
    /// [`DumpError::InvalidArgument`] if it is not UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, &ParseOptions::default())
    }

    /// Parses a dump saved to a file, with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Io`] if the file cannot be read, or
    /// [`DumpError::InvalidArgument`] if it is not UTF-8 or `options` are
    /// invalid.
    pub fn from_path_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading DNS configuration dump");
        Self::from_bytes_with(&std::fs::read(path)?, options)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Alias of [`len`](Self::len).
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.len()
    }

    /// `true` if the dump had no section header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// All records across sections, in dump order.
    pub fn records(&self) -> impl Iterator<Item = &ResolverRecord> {
        self.sections.iter().flat_map(Section::iter)
    }

    /// All records, across sections, for which `predicate` holds.
    ///
    /// ```
    /// use scutil_dns::Document;
    ///
    /// let doc = Document::parse(
    ///     "DNS configuration\nresolver #1\n  order : 1\n\
    ///      DNS configuration (for scoped queries)\nresolver #1\n  flags : Scoped\n",
    /// );
    /// let scoped = doc.find(|section, _| section.is_scoped());
    /// assert_eq!(scoped.len(), 1);
    /// assert!(scoped[0].is_scoped());
    /// ```
    pub fn find<P>(&self, mut predicate: P) -> Vec<&ResolverRecord>
    where
        P: FnMut(&Section, &ResolverRecord) -> bool,
    {
        self.sections
            .iter()
            .flat_map(|section| section.iter().map(move |record| (section, record)))
            .filter(|&(section, record)| predicate(section, record))
            .map(|(_, record)| record)
            .collect()
    }

    /// Non-fatal findings, in order of discovery.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    #[must_use]
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
