//! Streaming gene → transcript → exon assembly from flat GTF records.
//!
//! Records must arrive grouped the way Ensembl writes them: a gene row, then
//! for each transcript its transcript row followed by its exon rows, each
//! exon optionally followed by its CDS and codon rows. The assembler holds
//! exactly one gene under construction and hands back the previous gene
//! when the next gene row (or the end of input) shows it is complete.

use std::iter::FusedIterator;
use std::mem;

use crate::error::Error;
use crate::transcript::types::{Cds, Exon, Gene, Transcript};

use super::entry::{FeatureKind, FeatureRecord};

/// Assembly state between two records.
#[derive(Debug, Default)]
pub enum State {
    /// No gene row seen yet.
    #[default]
    Idle,
    /// A gene is open and has no open transcript.
    BuildingGene(Gene),
    /// A transcript is open and has no exons yet.
    BuildingTranscript { gene: Gene, transcript: Transcript },
    /// A transcript is open and collecting exons.
    BuildingExonList {
        gene: Gene,
        transcript: Transcript,
        exons: Vec<Exon>,
    },
}

/// Advance the assembly by one record.
///
/// Returns the next state and, when `record` starts a new gene, the gene it
/// closed.
pub fn step(state: State, record: FeatureRecord) -> Result<(State, Option<Gene>), Error> {
    match record.kind {
        FeatureKind::Gene => {
            let closed = finish(state);
            Ok((State::BuildingGene(gene_from_record(&record)?), closed))
        }
        FeatureKind::Transcript => {
            let gene = close_transcript(state, &record)?;
            check_gene_id(&gene, &record)?;
            let transcript = transcript_from_record(&record)?;
            Ok((State::BuildingTranscript { gene, transcript }, None))
        }
        FeatureKind::Exon => {
            let (gene, transcript, mut exons) = match state {
                State::BuildingTranscript { gene, transcript } => (gene, transcript, Vec::new()),
                State::BuildingExonList {
                    gene,
                    transcript,
                    exons,
                } => (gene, transcript, exons),
                State::Idle | State::BuildingGene(_) => {
                    return Err(out_of_order(&record, "has no open transcript"));
                }
            };
            check_transcript_id(&transcript, &record)?;
            exons.push(Exon::new(record.start, record.end));
            Ok((
                State::BuildingExonList {
                    gene,
                    transcript,
                    exons,
                },
                None,
            ))
        }
        FeatureKind::Cds | FeatureKind::StartCodon | FeatureKind::StopCodon => {
            let State::BuildingExonList {
                gene,
                mut transcript,
                mut exons,
            } = state
            else {
                return Err(out_of_order(&record, "has no preceding exon"));
            };
            check_transcript_id(&transcript, &record)?;

            let last_index = exons.len() - 1;
            match record.kind {
                FeatureKind::Cds => {
                    let exon = &mut exons[last_index];
                    if exon.cds.is_some() {
                        return Err(out_of_order(&record, "follows an exon that already has a CDS"));
                    }
                    exon.cds = Some(Cds {
                        start: record.start,
                        end: record.end,
                        protein_id: record.attribute("protein_id").map(str::to_string),
                    });
                }
                // A codon split over two exons yields two rows; the 5'-most
                // start row and the 3'-most stop row define the boundaries.
                FeatureKind::StartCodon => {
                    transcript.start_codon_exon.get_or_insert(last_index);
                }
                _ => transcript.stop_codon_exon = Some(last_index),
            }

            Ok((
                State::BuildingExonList {
                    gene,
                    transcript,
                    exons,
                },
                None,
            ))
        }
    }
}

/// Close any open transcript and gene; used at a gene boundary and at the end
/// of input.
pub fn finish(state: State) -> Option<Gene> {
    match state {
        State::Idle => None,
        State::BuildingGene(gene) => Some(gene),
        State::BuildingTranscript {
            mut gene,
            transcript,
        } => {
            gene.transcripts.push(transcript);
            Some(gene)
        }
        State::BuildingExonList {
            mut gene,
            mut transcript,
            exons,
        } => {
            transcript.exons = exons;
            gene.transcripts.push(transcript);
            Some(gene)
        }
    }
}

/// Close the open transcript (if any) and return its gene.
fn close_transcript(state: State, record: &FeatureRecord) -> Result<Gene, Error> {
    match state {
        State::Idle => Err(out_of_order(record, "has no open gene")),
        State::BuildingGene(gene) => Ok(gene),
        open => finish(open).ok_or_else(|| out_of_order(record, "has no open gene")),
    }
}

fn gene_from_record(record: &FeatureRecord) -> Result<Gene, Error> {
    Ok(Gene {
        id: record.required_attribute("gene_id")?.to_string(),
        symbol: record.attribute("gene_name").map(str::to_string),
        biotype: record
            .first_attribute(&["gene_biotype", "gene_type"])
            .map(str::to_string),
        chromosome: record.seqname.clone(),
        strand: record.strand,
        start: record.start,
        end: record.end,
        canonical_transcript_id: None,
        transcripts: Vec::new(),
    })
}

fn transcript_from_record(record: &FeatureRecord) -> Result<Transcript, Error> {
    let mut transcript = Transcript::new(
        record.required_attribute("transcript_id")?,
        record.start,
        record.end,
    );
    transcript.name = record.attribute("transcript_name").map(str::to_string);
    transcript.biotype = record
        .first_attribute(&["transcript_biotype", "transcript_type"])
        .map(str::to_string);
    Ok(transcript)
}

fn check_gene_id(gene: &Gene, record: &FeatureRecord) -> Result<(), Error> {
    match record.attribute("gene_id") {
        Some(id) if id != gene.id => Err(out_of_order(
            record,
            &format!("belongs to gene '{id}' but gene '{}' is open", gene.id),
        )),
        _ => Ok(()),
    }
}

fn check_transcript_id(transcript: &Transcript, record: &FeatureRecord) -> Result<(), Error> {
    match record.attribute("transcript_id") {
        Some(id) if id != transcript.id => Err(out_of_order(
            record,
            &format!(
                "belongs to transcript '{id}' but transcript '{}' is open",
                transcript.id
            ),
        )),
        _ => Ok(()),
    }
}

fn out_of_order(record: &FeatureRecord, reason: &str) -> Error {
    Error::MalformedRecordOrder(format!(
        "{} record at {} {reason}",
        record.kind,
        record.location()
    ))
}

/// Lazily assemble genes from a record stream.
///
/// The first error (from upstream or from assembly) is yielded once; the
/// iterator is exhausted afterwards.
pub fn assemble<I>(records: I) -> GeneAssembler<I::IntoIter>
where
    I: IntoIterator<Item = Result<FeatureRecord, Error>>,
{
    GeneAssembler {
        records: records.into_iter(),
        state: State::Idle,
        done: false,
    }
}

/// Iterator returned by [`assemble`].
pub struct GeneAssembler<I> {
    records: I,
    state: State,
    done: bool,
}

impl<I> Iterator for GeneAssembler<I>
where
    I: Iterator<Item = Result<FeatureRecord, Error>>,
{
    type Item = Result<Gene, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.records.next() {
                Some(Ok(record)) => match step(mem::take(&mut self.state), record) {
                    Ok((next, closed)) => {
                        self.state = next;
                        if let Some(gene) = closed {
                            return Some(Ok(gene));
                        }
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Some(Err(e)) => {
                    self.done = true;
                    self.state = State::Idle;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return finish(mem::take(&mut self.state)).map(Ok);
                }
            }
        }
    }
}

impl<I> FusedIterator for GeneAssembler<I> where I: Iterator<Item = Result<FeatureRecord, Error>> {}
