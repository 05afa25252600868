//! Lazy gene-model pipeline: records → assembled genes → coding regions →
//! annotation → sink.

use std::io::Write;

use crate::annotation::{ReferenceData, annotate};
use crate::document::JsonLinesWriter;
use crate::error::Error;
use crate::gtf::assembler::{GeneAssembler, assemble};
use crate::gtf::entry::FeatureRecord;
use crate::transcript::coding::compute_coding_region;
use crate::transcript::types::Gene;

/// Compute every transcript's coding region and join the reference tables.
#[must_use]
pub fn finalize_gene(mut gene: Gene, reference: &ReferenceData) -> Gene {
    let strand = gene.strand;
    gene.transcripts = std::mem::take(&mut gene.transcripts)
        .into_iter()
        .map(|transcript| compute_coding_region(transcript, strand))
        .collect();
    annotate(&mut gene, reference);
    gene
}

/// Iterator of finished genes, pulled one at a time from the record stream.
pub struct GeneModels<'r, I> {
    genes: GeneAssembler<I>,
    reference: &'r ReferenceData,
}

impl<I> Iterator for GeneModels<'_, I>
where
    I: Iterator<Item = Result<FeatureRecord, Error>>,
{
    type Item = Result<Gene, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.genes
            .next()
            .map(|gene| gene.map(|gene| finalize_gene(gene, self.reference)))
    }
}

/// Build finished gene models lazily from a record stream.
pub fn build_gene_models<I>(records: I, reference: &ReferenceData) -> GeneModels<'_, I::IntoIter>
where
    I: IntoIterator<Item = Result<FeatureRecord, Error>>,
{
    GeneModels {
        genes: assemble(records),
        reference,
    }
}

/// Counts gathered while writing gene models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub genes: usize,
    pub transcripts: usize,
    pub coding_transcripts: usize,
    pub canonical_transcripts: usize,
}

impl ImportSummary {
    pub fn add(&mut self, gene: &Gene) {
        self.genes += 1;
        self.transcripts += gene.transcripts.len();
        self.coding_transcripts += gene
            .transcripts
            .iter()
            .filter(|t| t.coding_span.is_coding())
            .count();
        self.canonical_transcripts += gene.transcripts.iter().filter(|t| t.is_canonical).count();
    }
}

/// Run the whole pipeline into a JSON-lines sink.
///
/// Stops at the first error; genes already written stay in `writer`, so
/// callers that need all-or-nothing output should write to a staging target.
pub fn import<I, W>(
    records: I,
    reference: &ReferenceData,
    writer: &mut JsonLinesWriter<W>,
) -> Result<ImportSummary, Error>
where
    I: IntoIterator<Item = Result<FeatureRecord, Error>>,
    W: Write,
{
    let mut summary = ImportSummary::default();
    for gene in build_gene_models(records, reference) {
        let gene = gene?;
        summary.add(&gene);
        writer.write_gene(&gene)?;
    }

    tracing::info!(
        genes = summary.genes,
        transcripts = summary.transcripts,
        coding = summary.coding_transcripts,
        "gene models written"
    );
    Ok(summary)
}
