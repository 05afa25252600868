//! GTF line and attribute parser.

use std::collections::HashMap;

use crate::error::Error;
use crate::strand::Strand;

use super::entry::{FeatureKind, FeatureRecord};

/// Result of parsing a single GTF line.
pub enum ParsedLine {
    Entry(Box<FeatureRecord>),
    Discarded,
    Comment,
}

/// Parse a single GTF line into a feature record.
///
/// Feature types outside [`FeatureKind`] (UTRs, selenocysteine, ...) are
/// discarded rather than rejected.
pub fn parse_line(line: &str) -> Result<ParsedLine, Error> {
    if line.starts_with('#') {
        return Ok(ParsedLine::Comment);
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ParsedLine::Comment);
    }

    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 9 {
        return Err(Error::Parse(format!(
            "GTF line has {} columns, expected 9",
            columns.len()
        )));
    }

    let Ok(kind) = columns[2].parse::<FeatureKind>() else {
        return Ok(ParsedLine::Discarded);
    };

    let start: u64 = columns[3]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid start '{}': {e}", columns[3])))?;
    let end: u64 = columns[4]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid end '{}': {e}", columns[4])))?;

    let strand = Strand::from_gtf(columns[6]);
    let attributes = parse_attributes(columns[8]);

    Ok(ParsedLine::Entry(Box::new(FeatureRecord::new(
        kind, columns[0], columns[1], start, end, strand, attributes,
    ))))
}

/// Parse GTF column 9: `key "value"; key "value"; ...`.
///
/// Tokens that do not split into a key and a value are dropped. When a key
/// repeats (e.g. `tag`), the first value is kept.
pub fn parse_attributes(attrs_str: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    for token in attrs_str.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match split_attribute(token) {
            Some((key, value)) => {
                attributes.entry(key.to_string()).or_insert(value);
            }
            None => tracing::debug!(token, "dropping unparsable GTF attribute"),
        }
    }

    attributes
}

/// Split one `key "value"` token, stripping quotes and collapsing whitespace.
fn split_attribute(token: &str) -> Option<(&str, String)> {
    let (key, value) = token.split_once(char::is_whitespace)?;
    let value = value.trim().trim_matches('"');
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value.split_whitespace().collect::<Vec<_>>().join(" ")))
}
