//! GTF reading: converts annotation rows into feature records and assembles
//! them into gene models.

pub mod assembler;
pub mod entry;
pub mod parser;

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Error;

use entry::FeatureRecord;
use parser::ParsedLine;

/// Lazy iterator over the feature records of a GTF stream.
///
/// Comments, blank lines and unsupported feature types are skipped. Errors
/// carry the 1-based line number.
pub struct Records<R> {
    lines: Lines<R>,
    line_num: usize,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<FeatureRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            self.line_num += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            match parser::parse_line(&line) {
                Ok(ParsedLine::Entry(record)) => return Some(Ok(*record)),
                Ok(ParsedLine::Discarded | ParsedLine::Comment) => continue,
                Err(e) => {
                    return Some(Err(Error::Parse(format!(
                        "{e} (line {}: {line})",
                        self.line_num
                    ))));
                }
            }
        }
        None
    }
}

/// Read GTF records from a buffered reader.
pub fn read_gtf<R: BufRead>(reader: R) -> Records<R> {
    Records::new(reader)
}

/// Read GTF records from a gzip-compressed stream.
pub fn read_gtf_gz<R: Read>(reader: R) -> Records<BufReader<MultiGzDecoder<R>>> {
    Records::new(BufReader::new(MultiGzDecoder::new(reader)))
}

/// Open a GTF file, decompressing when the name ends in `.gz`.
pub fn open_gtf(path: &Path) -> Result<Records<Box<dyn BufRead>>, Error> {
    Ok(Records::new(open_text(path)?))
}

/// Open a text file for line reading, decompressing `.gz` files.
pub(crate) fn open_text(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)?;
    let is_gz = path.extension().is_some_and(|ext| ext == "gz");
    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}
