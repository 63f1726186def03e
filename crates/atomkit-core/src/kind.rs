//! Atom kind definitions
//!
//! Every atom carries exactly one of six kinds:
//! - Scalars: string, integer, float, boolean
//! - Containers: list, dictionary
//!
//! The kind is derived from the payload and written on the wire as its tag name.

use std::fmt;

/// Closed tag identifying an atom's payload shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// UTF-8 text
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit IEEE-754 float, never NaN
    Float,
    /// true / false
    Boolean,
    /// Ordered sequence of atoms
    List,
    /// Insertion-ordered mapping from atom to atom
    Dictionary,
}

impl Kind {
    /// All kinds, in tag order
    pub const ALL: [Kind; 6] = [
        Kind::String,
        Kind::Integer,
        Kind::Float,
        Kind::Boolean,
        Kind::List,
        Kind::Dictionary,
    ];

    /// Length of the longest tag name
    pub const MAX_TAG_LEN: usize = 10;

    /// Parse from a wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Kind::String),
            "integer" => Some(Kind::Integer),
            "float" => Some(Kind::Float),
            "boolean" => Some(Kind::Boolean),
            "list" => Some(Kind::List),
            "dictionary" => Some(Kind::Dictionary),
            _ => None,
        }
    }

    /// Convert to wire tag
    #[inline]
    pub fn as_tag(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::List => "list",
            Kind::Dictionary => "dictionary",
        }
    }

    /// Does this kind hold nested atoms?
    pub fn is_container(self) -> bool {
        matches!(self, Kind::List | Kind::Dictionary)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(Kind::from_tag("tuple"), None);
        assert_eq!(Kind::from_tag("String"), None);
    }

    #[test]
    fn test_max_tag_len() {
        let longest = Kind::ALL.iter().map(|k| k.as_tag().len()).max();
        assert_eq!(longest, Some(Kind::MAX_TAG_LEN));
    }

    #[test]
    fn test_container_kinds() {
        let containers: Vec<_> = Kind::ALL.into_iter().filter(|k| k.is_container()).collect();
        assert_eq!(containers, vec![Kind::List, Kind::Dictionary]);
    }
}
