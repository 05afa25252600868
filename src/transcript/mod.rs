//! Gene model types and the per-transcript coding region calculation.

pub mod coding;
pub mod types;
