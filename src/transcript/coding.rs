//! Coding region calculation: cDNA offsets, coding boundaries and CDS totals.
//!
//! Exons are numbered in source order, which for Ensembl GTF is transcript
//! (5'→3') order on both strands. cDNA offsets are therefore cumulative in
//! that order, and an exon's `cdna_start` sits at its genomic `end` on the
//! reverse strand.

use crate::strand::Strand;

use super::types::{CodingBoundary, CodingRegion, CodingSpan, Exon, ExonCoding, Transcript};

/// The two ends of a coding sequence, in transcript direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodingEnd {
    FivePrime,
    ThreePrime,
}

/// Genomic edge of a CDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Low,
    High,
}

/// CDS edge that marks each coding end, per strand.
///
/// | strand  | 5' end    | 3' end    |
/// |---------|-----------|-----------|
/// | forward | CDS start | CDS end   |
/// | reverse | CDS end   | CDS start |
fn boundary_edge(strand: Strand, end: CodingEnd) -> Edge {
    match (strand.is_reverse(), end) {
        (false, CodingEnd::FivePrime) | (true, CodingEnd::ThreePrime) => Edge::Low,
        (false, CodingEnd::ThreePrime) | (true, CodingEnd::FivePrime) => Edge::High,
    }
}

/// Compute cDNA offsets and the coding region of a transcript.
///
/// The result depends only on exon bounds, CDS sub-records and explicit
/// codon exons, so applying it twice yields the same transcript. Partially
/// annotated transcripts keep the unresolved boundary empty.
#[must_use]
pub fn compute_coding_region(mut transcript: Transcript, strand: Strand) -> Transcript {
    assign_cdna_offsets(&mut transcript.exons);
    transcript.length = transcript.exons.last().map_or(0, |e| e.cdna_end);

    for exon in &mut transcript.exons {
        exon.coding = None;
    }
    transcript.translation_id = None;
    transcript.coding_region = None;
    transcript.coding_span = resolve_span(&transcript);

    let exon_count = transcript.exons.len();
    let exons = &mut transcript.exons;

    let (first, last) = match transcript.coding_span {
        CodingSpan::NonCoding => return transcript,
        CodingSpan::Coding { start, end } => (start, end),
        CodingSpan::FivePrimeIncomplete { end } => (first_cds_exon(exons).unwrap_or(end).min(end), end),
        CodingSpan::ThreePrimeIncomplete { start } => (
            start,
            last_cds_exon(exons)
                .unwrap_or(start)
                .clamp(start, exon_count - 1),
        ),
    };

    for exon in &mut exons[first..=last] {
        exon.coding = Some(ExonCoding {
            genomic_start: exon.start,
            genomic_end: exon.end,
            cdna_start: exon.cdna_start,
            cdna_end: exon.cdna_end,
        });
    }

    let five_prime = transcript
        .coding_span
        .start_exon()
        .and_then(|index| locate_boundary(exons, index, first, last, strand, CodingEnd::FivePrime));
    let three_prime = transcript
        .coding_span
        .end_exon()
        .and_then(|index| locate_boundary(exons, index, first, last, strand, CodingEnd::ThreePrime));

    let span = &exons[first..=last];
    let length_cds: u64 = span.iter().map(Exon::cds_length).sum();
    transcript.translation_id = span
        .iter()
        .filter_map(|e| e.cds.as_ref())
        .find_map(|c| c.protein_id.clone());

    transcript.coding_region = Some(CodingRegion {
        five_prime,
        three_prime,
        length_cds,
        length_amino_acid: amino_acid_count(length_cds),
    });

    transcript
}

/// Assign cumulative 1-based cDNA offsets in source order.
pub fn assign_cdna_offsets(exons: &mut [Exon]) {
    let mut cdna_start: u64 = 1;
    for exon in exons {
        exon.cdna_start = cdna_start;
        exon.cdna_end = cdna_start + (exon.end - exon.start);
        cdna_start = exon.cdna_end + 1;
    }
}

/// Number of codons, rounding a partial terminal codon to the nearest whole.
#[must_use]
pub fn amino_acid_count(length_cds: u64) -> u64 {
    (length_cds + 1) / 3
}

/// Explicit codon exons win; otherwise the first and last exons carrying a CDS.
fn resolve_span(transcript: &Transcript) -> CodingSpan {
    let exons = &transcript.exons;
    let in_range = |index: &usize| *index < exons.len();

    let start = transcript
        .start_codon_exon
        .filter(in_range)
        .or_else(|| first_cds_exon(exons));
    let end = transcript
        .stop_codon_exon
        .filter(in_range)
        .or_else(|| last_cds_exon(exons));

    CodingSpan::from_bounds(start, end)
}

fn first_cds_exon(exons: &[Exon]) -> Option<usize> {
    exons.iter().position(|e| e.cds.is_some())
}

fn last_cds_exon(exons: &[Exon]) -> Option<usize> {
    exons.iter().rposition(|e| e.cds.is_some())
}

/// Locate one coding end and narrow the coding coordinates of its exon.
///
/// When the boundary exon has no CDS (a codon split over an exon junction),
/// the neighbouring exon inside the span supplies the boundary and the
/// CDS-less exon is dropped from the coding span.
fn locate_boundary(
    exons: &mut [Exon],
    index: usize,
    first: usize,
    last: usize,
    strand: Strand,
    end: CodingEnd,
) -> Option<CodingBoundary> {
    let index = if exons[index].cds.is_some() {
        index
    } else {
        exons[index].coding = None;
        let neighbour = match end {
            CodingEnd::FivePrime => index.checked_add(1).filter(|&i| i <= last)?,
            CodingEnd::ThreePrime => index.checked_sub(1).filter(|&i| i >= first)?,
        };
        if exons[neighbour].cds.is_none() {
            return None;
        }
        neighbour
    };

    let exon = &mut exons[index];
    let cds = exon.cds.as_ref()?;
    // A CDS overhanging its exon is clamped to the exon edge.
    let genomic = exon.clamp(match boundary_edge(strand, end) {
        Edge::Low => cds.start,
        Edge::High => cds.end,
    });
    let offset = if strand.is_reverse() {
        exon.end - genomic
    } else {
        genomic - exon.start
    };
    let cdna = exon.cdna_start + offset;

    let coding = exon.coding.get_or_insert(ExonCoding {
        genomic_start: exon.start,
        genomic_end: exon.end,
        cdna_start: exon.cdna_start,
        cdna_end: exon.cdna_end,
    });
    match boundary_edge(strand, end) {
        Edge::Low => coding.genomic_start = genomic,
        Edge::High => coding.genomic_end = genomic,
    }
    match end {
        CodingEnd::FivePrime => coding.cdna_start = cdna,
        CodingEnd::ThreePrime => coding.cdna_end = cdna,
    }

    Some(CodingBoundary {
        genomic,
        cdna,
        seq_exon: offset + 1,
    })
}
