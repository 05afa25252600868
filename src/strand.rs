//! Strand orientation for genomic features.

use serde::{Serialize, Serializer};

/// Strand orientation of a genomic feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Strand {
    Forward = 1,
    Reverse = -1,
    #[default]
    Unknown = 0,
}

impl Strand {
    /// Parse from GTF column 7. Anything other than "+" or "-" is unknown.
    #[must_use]
    pub fn from_gtf(s: &str) -> Self {
        match s {
            "+" => Self::Forward,
            "-" => Self::Reverse,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }

    /// Numeric form used in output documents: +1, -1 or 0.
    #[must_use]
    pub fn to_i8(self) -> i8 {
        self as i8
    }
}

impl Serialize for Strand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.to_i8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_gtf() {
        assert_eq!(Strand::from_gtf("+"), Strand::Forward);
        assert_eq!(Strand::from_gtf("-"), Strand::Reverse);
        assert_eq!(Strand::from_gtf("."), Strand::Unknown);
        assert_eq!(Strand::from_gtf(""), Strand::Unknown);
    }

    #[test]
    fn numeric_values() {
        assert_eq!(Strand::Forward.to_i8(), 1);
        assert_eq!(Strand::Reverse.to_i8(), -1);
        assert_eq!(Strand::Unknown.to_i8(), 0);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Strand::Reverse).unwrap(), "-1");
    }
}
