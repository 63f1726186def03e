//! Per-atom header
//!
//! Every encoded atom, top-level or nested, starts with:
//! - Bytes 0-3: Tag length (BE u32)
//! - Tag: kind name, UTF-8
//! - 4 bytes: Payload length (BE u32)
//!
//! The payload follows immediately, so an atom spans
//! `4 + tag_len + 4 + payload_len` bytes.

use atomkit_core::{AtomError, AtomResult, Kind, Malformation};
use bytes::BufMut;

/// Size of each length field
pub const LEN_FIELD_SIZE: usize = 4;

/// Smallest possible header (length fields around an empty tag)
pub const MIN_HEADER_SIZE: usize = 2 * LEN_FIELD_SIZE;

/// Parsed atom header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtomHeader {
    /// Payload kind
    pub kind: Kind,
    /// Length of this atom's payload in bytes
    pub payload_len: u32,
}

impl AtomHeader {
    /// Build a header, checking the payload fits the length field
    pub fn new(kind: Kind, payload_len: usize) -> AtomResult<Self> {
        let payload_len = u32::try_from(payload_len)
            .map_err(|_| AtomError::PayloadTooLarge { len: payload_len })?;
        Ok(AtomHeader { kind, payload_len })
    }

    /// Header size for a given kind
    #[inline]
    pub fn size_for(kind: Kind) -> usize {
        MIN_HEADER_SIZE + kind.as_tag().len()
    }

    /// Bytes taken by this header
    #[inline]
    pub fn size(&self) -> usize {
        Self::size_for(self.kind)
    }

    /// Bytes taken by header and payload together
    #[inline]
    pub fn total_len(&self) -> usize {
        self.size() + self.payload_len as usize
    }

    /// Parse header from bytes
    pub fn parse(buf: &[u8]) -> AtomResult<Self> {
        let tag_len = read_len(buf, 0)?;

        if tag_len > Kind::MAX_TAG_LEN {
            return Err(Malformation::TagTooLong(tag_len).into());
        }

        let tag_end = LEN_FIELD_SIZE + tag_len;
        if buf.len() < tag_end {
            return Err(Malformation::BufferTooShort {
                expected: tag_end,
                actual: buf.len(),
            }
            .into());
        }

        let tag = std::str::from_utf8(&buf[LEN_FIELD_SIZE..tag_end])
            .map_err(|_| Malformation::TagNotUtf8)?;
        let kind = Kind::from_tag(tag).ok_or_else(|| Malformation::UnknownTag(tag.to_owned()))?;

        let payload_len = read_len(buf, tag_end)?;

        Ok(AtomHeader {
            kind,
            payload_len: payload_len as u32,
        })
    }

    /// Serialize header
    pub fn serialize<B: BufMut>(&self, buf: &mut B) {
        let tag = self.kind.as_tag();
        buf.put_u32(tag.len() as u32);
        buf.put_slice(tag.as_bytes());
        buf.put_u32(self.payload_len);
    }

    /// Serialize header to a new Vec
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        self.serialize(&mut buf);
        buf
    }
}

/// Read a BE u32 length field at `offset`
fn read_len(buf: &[u8], offset: usize) -> AtomResult<usize> {
    let end = offset + LEN_FIELD_SIZE;
    let field: [u8; LEN_FIELD_SIZE] = buf
        .get(offset..end)
        .and_then(|b| b.try_into().ok())
        .ok_or(AtomError::MalformedEncoding(Malformation::BufferTooShort {
            expected: end,
            actual: buf.len(),
        }))?;
    Ok(u32::from_be_bytes(field) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        for kind in Kind::ALL {
            let header = AtomHeader::new(kind, 1234).unwrap();
            let bytes = header.to_bytes();
            assert_eq!(bytes.len(), header.size());

            let parsed = AtomHeader::parse(&bytes).unwrap();
            assert_eq!(parsed, header);
            assert_eq!(parsed.total_len(), header.size() + 1234);
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = AtomHeader::new(Kind::List, 7).unwrap().to_bytes();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 4, b'l', b'i', b's', b't', 0, 0, 0, 7]
        );
    }

    #[test]
    fn test_header_too_short() {
        let result = AtomHeader::parse(&[0, 0]);
        assert!(matches!(
            result,
            Err(AtomError::MalformedEncoding(Malformation::BufferTooShort { .. }))
        ));

        // Tag length 10 with only 3 tag bytes present
        let buf = [0, 0, 0, 10, b'd', b'i', b'c'];
        assert_eq!(
            AtomHeader::parse(&buf),
            Err(AtomError::MalformedEncoding(Malformation::BufferTooShort {
                expected: 14,
                actual: 7,
            }))
        );

        // Tag present but payload length field missing
        let buf = [0, 0, 0, 4, b'l', b'i', b's', b't', 0];
        assert!(AtomHeader::parse(&buf).unwrap_err().is_malformed());
    }

    #[test]
    fn test_unknown_tag() {
        let buf = [0, 0, 0, 5, b't', b'u', b'p', b'l', b'e', 0, 0, 0, 0];
        assert_eq!(
            AtomHeader::parse(&buf),
            Err(AtomError::MalformedEncoding(Malformation::UnknownTag(
                "tuple".into()
            )))
        );
    }

    #[test]
    fn test_oversized_tag_len() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(
            AtomHeader::parse(&buf),
            Err(AtomError::MalformedEncoding(Malformation::TagTooLong(
                u32::MAX as usize
            )))
        );
    }

    #[test]
    fn test_tag_not_utf8() {
        let buf = [0, 0, 0, 2, 0xC3, 0x28, 0, 0, 0, 0];
        assert_eq!(
            AtomHeader::parse(&buf),
            Err(AtomError::MalformedEncoding(Malformation::TagNotUtf8))
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_header_roundtrip(index in 0..Kind::ALL.len(), len in any::<u32>()) {
                let header = AtomHeader::new(Kind::ALL[index], len as usize).unwrap();
                let bytes = header.to_bytes();
                prop_assert_eq!(bytes.len(), header.size());
                prop_assert_eq!(AtomHeader::parse(&bytes), Ok(header));
            }

            #[test]
            fn prop_parse_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..32)) {
                if let Err(err) = AtomHeader::parse(&buf) {
                    prop_assert!(err.is_malformed());
                }
            }
        }
    }
}
