//! GTF data structures for parsed feature records.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::strand::Strand;

/// Feature types (GTF column 3) that take part in gene-model assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Gene,
    Transcript,
    Exon,
    Cds,
    StartCodon,
    StopCodon,
}

impl FeatureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gene => "gene",
            Self::Transcript => "transcript",
            Self::Exon => "exon",
            Self::Cds => "CDS",
            Self::StartCodon => "start_codon",
            Self::StopCodon => "stop_codon",
        }
    }
}

impl FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gene" => Ok(Self::Gene),
            "transcript" => Ok(Self::Transcript),
            "exon" => Ok(Self::Exon),
            "CDS" => Ok(Self::Cds),
            "start_codon" => Ok(Self::StartCodon),
            "stop_codon" => Ok(Self::StopCodon),
            _ => Err(Error::Parse(format!("unsupported GTF feature type: '{s}'"))),
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed GTF row.
///
/// Coordinates are 1-based inclusive with `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub kind: FeatureKind,
    pub seqname: String,
    pub source: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub attributes: HashMap<String, String>,
}

impl FeatureRecord {
    /// Builds a record, swapping the bounds if they arrive reversed.
    pub fn new(
        kind: FeatureKind,
        seqname: impl Into<String>,
        source: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
        attributes: HashMap<String, String>,
    ) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };

        Self {
            kind,
            seqname: seqname.into(),
            source: source.into(),
            start,
            end,
            strand,
            attributes,
        }
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// First present attribute among `keys`.
    #[must_use]
    pub fn first_attribute(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.attribute(key))
    }

    /// Required attribute; a missing key is a parse error naming the record.
    pub fn required_attribute(&self, key: &str) -> Result<&str, Error> {
        self.attribute(key).ok_or_else(|| {
            Error::Parse(format!(
                "{} record at {} is missing required attribute '{key}'",
                self.kind,
                self.location()
            ))
        })
    }

    /// "seqname:start-end", used in error messages.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}:{}-{}", self.seqname, self.start, self.end)
    }
}
