//! Gene-model builder: assembles Ensembl GTF records into genes and
//! transcripts, computes coding regions, and joins canonical-transcript and
//! protein-domain annotation.

pub mod error;

pub mod annotation;
pub mod cli;
pub mod config;
pub mod document;
pub mod gtf;
pub mod pipeline;
pub mod strand;
pub mod transcript;
