//! Gene model types produced by the assembler and refined by the coding-region
//! calculator and annotator.

use serde::Serialize;

use crate::strand::Strand;

/// CDS sub-record attached to the exon it annotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cds {
    pub start: u64,
    pub end: u64,
    pub protein_id: Option<String>,
}

/// Coding coordinates of the portion of an exon inside the coding span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExonCoding {
    pub genomic_start: u64,
    pub genomic_end: u64,
    pub cdna_start: u64,
    pub cdna_end: u64,
}

/// An exon in genomic coordinates with its cDNA placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exon {
    pub start: u64,
    pub end: u64,
    pub cdna_start: u64,
    pub cdna_end: u64,
    pub cds: Option<Cds>,
    pub coding: Option<ExonCoding>,
}

impl Exon {
    /// New exon with genomic bounds only; cDNA offsets are filled in later.
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end,
            cdna_start: 0,
            cdna_end: 0,
            cds: None,
            coding: None,
        }
    }

    /// Clamp a genomic position into the exon's bounds.
    #[must_use]
    pub fn clamp(&self, position: u64) -> u64 {
        position.clamp(self.start, self.end)
    }

    /// Bases of the attached CDS that fall inside the exon.
    #[must_use]
    pub fn cds_length(&self) -> u64 {
        self.cds.as_ref().map_or(0, |cds| {
            let start = cds.start.max(self.start);
            let end = cds.end.min(self.end);
            if start <= end { end - start + 1 } else { 0 }
        })
    }
}

/// Which ends of the coding sequence could be located, as exon indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingSpan {
    #[default]
    NonCoding,
    /// The start boundary is unknown.
    FivePrimeIncomplete { end: usize },
    /// The end boundary is unknown.
    ThreePrimeIncomplete { start: usize },
    Coding { start: usize, end: usize },
}

impl CodingSpan {
    /// Build from a pair of optional boundaries. Boundaries given out of
    /// order are swapped so that `start <= end`.
    #[must_use]
    pub fn from_bounds(start: Option<usize>, end: Option<usize>) -> Self {
        match (start, end) {
            (None, None) => Self::NonCoding,
            (None, Some(end)) => Self::FivePrimeIncomplete { end },
            (Some(start), None) => Self::ThreePrimeIncomplete { start },
            (Some(start), Some(end)) => Self::Coding {
                start: start.min(end),
                end: start.max(end),
            },
        }
    }

    #[must_use]
    pub fn start_exon(self) -> Option<usize> {
        match self {
            Self::ThreePrimeIncomplete { start } | Self::Coding { start, .. } => Some(start),
            _ => None,
        }
    }

    #[must_use]
    pub fn end_exon(self) -> Option<usize> {
        match self {
            Self::FivePrimeIncomplete { end } | Self::Coding { end, .. } => Some(end),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_coding(self) -> bool {
        self != Self::NonCoding
    }
}

/// One end of the coding sequence, located within its boundary exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingBoundary {
    /// Genomic position of the boundary base.
    pub genomic: u64,
    /// cDNA position of the boundary base.
    pub cdna: u64,
    /// 1-based offset of the boundary base within its exon, in transcript direction.
    pub seq_exon: u64,
}

/// Coding sequence summary derived by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodingRegion {
    /// Boundary at the 5' end of the coding sequence.
    pub five_prime: Option<CodingBoundary>,
    /// Boundary at the 3' end of the coding sequence.
    pub three_prime: Option<CodingBoundary>,
    pub length_cds: u64,
    pub length_amino_acid: u64,
}

/// A protein-domain hit attached to a transcript, copied verbatim from the
/// reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProteinDomain {
    pub interpro_id: String,
    pub hit_name: String,
    pub source: String,
    pub description: String,
    pub start: u64,
    pub end: u64,
}

/// A transcript with its exons in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub id: String,
    pub name: Option<String>,
    pub biotype: Option<String>,
    pub start: u64,
    pub end: u64,
    pub exons: Vec<Exon>,
    /// Exon holding an explicit start_codon record, if any.
    pub start_codon_exon: Option<usize>,
    /// Exon holding an explicit stop_codon record, if any.
    pub stop_codon_exon: Option<usize>,
    pub coding_span: CodingSpan,
    pub coding_region: Option<CodingRegion>,
    pub translation_id: Option<String>,
    pub length: u64,
    pub is_canonical: bool,
    pub protein_domains: Vec<ProteinDomain>,
}

impl Transcript {
    #[must_use]
    pub fn new(id: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            id: id.into(),
            name: None,
            biotype: None,
            start,
            end,
            exons: Vec::new(),
            start_codon_exon: None,
            stop_codon_exon: None,
            coding_span: CodingSpan::NonCoding,
            coding_region: None,
            translation_id: None,
            length: 0,
            is_canonical: false,
            protein_domains: Vec::new(),
        }
    }

    #[must_use]
    pub fn start_exon(&self) -> Option<usize> {
        self.coding_span.start_exon()
    }

    #[must_use]
    pub fn end_exon(&self) -> Option<usize> {
        self.coding_span.end_exon()
    }

    /// Genomic start of the coding region (lowest coordinate).
    #[must_use]
    pub fn coding_region_start(&self, strand: Strand) -> Option<u64> {
        let region = self.coding_region.as_ref()?;
        let boundary = if strand.is_reverse() {
            region.three_prime
        } else {
            region.five_prime
        };
        boundary.map(|b| b.genomic)
    }

    /// Genomic end of the coding region (highest coordinate).
    #[must_use]
    pub fn coding_region_end(&self, strand: Strand) -> Option<u64> {
        let region = self.coding_region.as_ref()?;
        let boundary = if strand.is_reverse() {
            region.five_prime
        } else {
            region.three_prime
        };
        boundary.map(|b| b.genomic)
    }
}

/// A gene with its transcripts in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub id: String,
    pub symbol: Option<String>,
    pub biotype: Option<String>,
    pub chromosome: String,
    pub strand: Strand,
    pub start: u64,
    pub end: u64,
    pub canonical_transcript_id: Option<String>,
    pub transcripts: Vec<Transcript>,
}
