//! Canonical transcript and protein-domain annotation.
//!
//! Both tables are loaded once and passed to [`annotate`] by reference; a
//! gene or transcript absent from a table is left unannotated.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::gtf::open_text;
use crate::transcript::types::{Gene, ProteinDomain};

/// Immutable lookup tables joined onto assembled genes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// gene id → canonical transcript id
    pub canonical_transcripts: HashMap<String, String>,
    /// transcript id → domain hits, in table order
    pub protein_domains: HashMap<String, Vec<ProteinDomain>>,
}

impl ReferenceData {
    /// Load whichever tables are given; `.gz` files are decompressed.
    pub fn from_paths(
        canonical_path: Option<&Path>,
        domains_path: Option<&Path>,
    ) -> Result<Self, Error> {
        let canonical_transcripts = match canonical_path {
            Some(path) => parse_canonical_transcripts(open_text(path)?)?,
            None => HashMap::new(),
        };
        let protein_domains = match domains_path {
            Some(path) => parse_protein_domains(open_text(path)?)?,
            None => HashMap::new(),
        };
        Ok(Self {
            canonical_transcripts,
            protein_domains,
        })
    }
}

/// Mark the canonical transcript and attach protein domains.
///
/// The canonical id from the table replaces the gene's current one; genes not
/// in the table keep whatever id they already carry.
pub fn annotate(gene: &mut Gene, reference: &ReferenceData) {
    if let Some(id) = reference.canonical_transcripts.get(&gene.id) {
        gene.canonical_transcript_id = Some(id.clone());
    }

    for transcript in &mut gene.transcripts {
        transcript.is_canonical =
            gene.canonical_transcript_id.as_deref() == Some(transcript.id.as_str());
        transcript.protein_domains = reference
            .protein_domains
            .get(&transcript.id)
            .cloned()
            .unwrap_or_default();
    }
}

/// Parse `gene_id<TAB>transcript_id` rows.
pub fn parse_canonical_transcripts<R: BufRead>(
    reader: R,
) -> Result<HashMap<String, String>, Error> {
    let mut result = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(columns) = data_columns(&line) else {
            continue;
        };
        if columns.len() < 2 {
            return Err(Error::Parse(format!(
                "line {}: expected 2 columns in canonical transcript table, got {}",
                line_num + 1,
                columns.len()
            )));
        }
        result.insert(columns[0].to_string(), columns[1].to_string());
    }

    Ok(result)
}

/// Parse `transcript_id interpro_id hit_name source description start end`
/// rows (tab-separated).
pub fn parse_protein_domains<R: BufRead>(
    reader: R,
) -> Result<HashMap<String, Vec<ProteinDomain>>, Error> {
    let mut result: HashMap<String, Vec<ProteinDomain>> = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(columns) = data_columns(&line) else {
            continue;
        };
        if columns.len() < 7 {
            return Err(Error::Parse(format!(
                "line {}: expected 7 columns in protein domain table, got {}",
                line_num + 1,
                columns.len()
            )));
        }

        let position = |index: usize| -> Result<u64, Error> {
            columns[index].parse().map_err(|e| {
                Error::Parse(format!(
                    "line {}: invalid domain position '{}': {e}",
                    line_num + 1,
                    columns[index]
                ))
            })
        };

        let domain = ProteinDomain {
            interpro_id: columns[1].to_string(),
            hit_name: columns[2].to_string(),
            source: columns[3].to_string(),
            description: columns[4].to_string(),
            start: position(5)?,
            end: position(6)?,
        };
        result
            .entry(columns[0].to_string())
            .or_default()
            .push(domain);
    }

    Ok(result)
}

/// Tab-split a data row; `None` for comments and blank lines.
fn data_columns(line: &str) -> Option<Vec<&str>> {
    if line.starts_with('#') || line.trim().is_empty() {
        return None;
    }
    Some(line.split('\t').map(str::trim).collect())
}
