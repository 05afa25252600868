//! Per-gene output documents and a JSON-lines sink.
//!
//! The document flattens the typed model into the nullable field layout
//! stored downstream: boundary indices, coding coordinates and totals are
//! `null` when the transcript has no value for them.

use std::io::Write;

use serde::Serialize;

use crate::error::Error;
use crate::strand::Strand;
use crate::transcript::types::{Exon, Gene, ProteinDomain, Transcript};

#[derive(Debug, Serialize)]
pub struct GeneDocument<'a> {
    pub id: &'a str,
    pub symbol: Option<&'a str>,
    pub biotype: Option<&'a str>,
    pub chromosome: &'a str,
    pub strand: Strand,
    pub start: u64,
    pub end: u64,
    pub canonical_transcript_id: Option<&'a str>,
    pub transcripts: Vec<TranscriptDocument<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptDocument<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub biotype: Option<&'a str>,
    pub start: u64,
    pub end: u64,
    pub is_canonical: bool,
    pub translation_id: Option<&'a str>,
    pub start_exon: Option<usize>,
    pub end_exon: Option<usize>,
    pub coding_region_start: Option<u64>,
    pub coding_region_end: Option<u64>,
    pub cdna_coding_start: Option<u64>,
    pub cdna_coding_end: Option<u64>,
    pub seq_exon_start: Option<u64>,
    pub seq_exon_end: Option<u64>,
    pub length: u64,
    pub length_cds: Option<u64>,
    pub length_amino_acid: Option<u64>,
    pub number_of_exons: usize,
    pub exons: Vec<ExonDocument<'a>>,
    pub protein_domains: &'a [ProteinDomain],
}

#[derive(Debug, Serialize)]
pub struct ExonDocument<'a> {
    pub start: u64,
    pub end: u64,
    pub cdna_start: u64,
    pub cdna_end: u64,
    pub cds: Option<CdsDocument<'a>>,
    pub genomic_coding_start: Option<u64>,
    pub genomic_coding_end: Option<u64>,
    pub cdna_coding_start: Option<u64>,
    pub cdna_coding_end: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CdsDocument<'a> {
    pub start: u64,
    pub end: u64,
    pub protein_id: Option<&'a str>,
}

impl<'a> GeneDocument<'a> {
    #[must_use]
    pub fn new(gene: &'a Gene) -> Self {
        Self {
            id: &gene.id,
            symbol: gene.symbol.as_deref(),
            biotype: gene.biotype.as_deref(),
            chromosome: &gene.chromosome,
            strand: gene.strand,
            start: gene.start,
            end: gene.end,
            canonical_transcript_id: gene.canonical_transcript_id.as_deref(),
            transcripts: gene
                .transcripts
                .iter()
                .map(|t| TranscriptDocument::new(t, gene.strand))
                .collect(),
        }
    }
}

impl<'a> TranscriptDocument<'a> {
    #[must_use]
    pub fn new(transcript: &'a Transcript, strand: Strand) -> Self {
        let region = transcript.coding_region.as_ref();
        let five_prime = region.and_then(|r| r.five_prime);
        let three_prime = region.and_then(|r| r.three_prime);

        Self {
            id: &transcript.id,
            name: transcript.name.as_deref(),
            biotype: transcript.biotype.as_deref(),
            start: transcript.start,
            end: transcript.end,
            is_canonical: transcript.is_canonical,
            translation_id: transcript.translation_id.as_deref(),
            start_exon: transcript.start_exon(),
            end_exon: transcript.end_exon(),
            coding_region_start: transcript.coding_region_start(strand),
            coding_region_end: transcript.coding_region_end(strand),
            cdna_coding_start: five_prime.map(|b| b.cdna),
            cdna_coding_end: three_prime.map(|b| b.cdna),
            seq_exon_start: five_prime.map(|b| b.seq_exon),
            seq_exon_end: three_prime.map(|b| b.seq_exon),
            length: transcript.length,
            length_cds: region.map(|r| r.length_cds),
            length_amino_acid: region.map(|r| r.length_amino_acid),
            number_of_exons: transcript.exons.len(),
            exons: transcript.exons.iter().map(ExonDocument::new).collect(),
            protein_domains: &transcript.protein_domains,
        }
    }
}

impl<'a> ExonDocument<'a> {
    #[must_use]
    pub fn new(exon: &'a Exon) -> Self {
        Self {
            start: exon.start,
            end: exon.end,
            cdna_start: exon.cdna_start,
            cdna_end: exon.cdna_end,
            cds: exon.cds.as_ref().map(|cds| CdsDocument {
                start: cds.start,
                end: cds.end,
                protein_id: cds.protein_id.as_deref(),
            }),
            genomic_coding_start: exon.coding.map(|c| c.genomic_start),
            genomic_coding_end: exon.coding.map(|c| c.genomic_end),
            cdna_coding_start: exon.coding.map(|c| c.cdna_start),
            cdna_coding_end: exon.coding.map(|c| c.cdna_end),
        }
    }
}

/// Writes one JSON document per line.
pub struct JsonLinesWriter<W: Write> {
    inner: W,
    count: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub fn write_gene(&mut self, gene: &Gene) -> Result<(), Error> {
        serde_json::to_writer(&mut self.inner, &GeneDocument::new(gene))
            .map_err(|e| Error::Validation(format!("failed to serialize gene {}: {e}", gene.id)))?;
        self.inner.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    /// Number of genes written so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::transcript::coding::compute_coding_region;
    use crate::transcript::types::Cds;

    use super::*;

    fn coding_gene() -> Gene {
        let mut exon1 = Exon::new(100, 200);
        exon1.cds = Some(Cds {
            start: 150,
            end: 200,
            protein_id: Some("P1".to_string()),
        });
        let mut exon2 = Exon::new(300, 400);
        exon2.cds = Some(Cds {
            start: 300,
            end: 350,
            protein_id: Some("P1".to_string()),
        });
        let mut tx = Transcript::new("T1", 100, 400);
        tx.exons = vec![exon1, exon2];
        tx.is_canonical = true;

        Gene {
            id: "G1".to_string(),
            symbol: Some("SYM".to_string()),
            biotype: None,
            chromosome: "1".to_string(),
            strand: Strand::Forward,
            start: 100,
            end: 400,
            canonical_transcript_id: Some("T1".to_string()),
            transcripts: vec![
                compute_coding_region(tx, Strand::Forward),
                compute_coding_region(Transcript::new("T2", 100, 200), Strand::Forward),
            ],
        }
    }

    #[test]
    fn gene_document_fields() {
        let gene = coding_gene();
        let doc = serde_json::to_value(GeneDocument::new(&gene)).unwrap();

        assert_eq!(doc["id"], "G1");
        assert_eq!(doc["strand"], 1);
        assert_eq!(doc["biotype"], Value::Null);
        assert_eq!(doc["canonical_transcript_id"], "T1");

        let tx = &doc["transcripts"][0];
        assert_eq!(tx["start_exon"], 0);
        assert_eq!(tx["end_exon"], 1);
        assert_eq!(tx["coding_region_start"], 150);
        assert_eq!(tx["coding_region_end"], 350);
        assert_eq!(tx["cdna_coding_start"], 51);
        assert_eq!(tx["cdna_coding_end"], 152);
        assert_eq!(tx["length_cds"], 102);
        assert_eq!(tx["length_amino_acid"], 34);
        assert_eq!(tx["number_of_exons"], 2);
        assert_eq!(tx["translation_id"], "P1");
        assert_eq!(tx["exons"][0]["cds"]["protein_id"], "P1");
        assert_eq!(tx["exons"][0]["genomic_coding_start"], 150);
        assert_eq!(tx["exons"][1]["cdna_coding_end"], 152);
    }

    #[test]
    fn non_coding_fields_are_null() {
        let gene = coding_gene();
        let doc = serde_json::to_value(GeneDocument::new(&gene)).unwrap();
        let tx = &doc["transcripts"][1];
        assert_eq!(tx["start_exon"], Value::Null);
        assert_eq!(tx["end_exon"], Value::Null);
        assert_eq!(tx["coding_region_start"], Value::Null);
        assert_eq!(tx["length_cds"], Value::Null);
        assert_eq!(tx["translation_id"], Value::Null);
        assert_eq!(tx["number_of_exons"], 0);
    }

    #[test]
    fn json_lines_one_gene_per_line() {
        let gene = coding_gene();
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write_gene(&gene).unwrap();
        writer.write_gene(&gene).unwrap();
        assert_eq!(writer.count(), 2);

        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let doc: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(doc["transcripts"][0]["id"], "T1");
    }
}
