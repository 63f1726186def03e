//! Atom encoder and decoder
//!
//! Payload layout per kind:
//! - string: raw UTF-8
//! - integer: 8 bytes, BE two's complement
//! - float: 8 bytes, BE IEEE-754
//! - boolean: 1 byte, 0x00 or 0x01
//! - list: element encodings back to back
//! - dictionary: (key, value) encodings back to back, insertion order
//!
//! Containers carry no element count. Elements are read until the parent's
//! payload is consumed exactly.

use atomkit_core::{Atom, AtomError, AtomMap, AtomResult, Kind, Malformation, Value};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::{AtomHeader, LEN_FIELD_SIZE};

/// Decoder limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum container nesting (a top-level list is depth 1)
    pub max_depth: usize,
    /// Maximum declared payload length of any single atom
    pub max_payload_len: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_depth: 64,
            max_payload_len: 16 * 1024 * 1024,
        }
    }
}

impl DecodeConfig {
    /// Tight limits for untrusted input
    pub fn strict() -> Self {
        DecodeConfig {
            max_depth: 16,
            max_payload_len: 64 * 1024,
        }
    }

    /// Only the u32 length field bounds payloads
    pub fn permissive() -> Self {
        DecodeConfig {
            max_depth: 512,
            max_payload_len: u32::MAX as usize,
        }
    }
}

/// Total encoded size of an atom
pub fn encoded_len(atom: &Atom) -> usize {
    AtomHeader::size_for(atom.kind()) + payload_len(atom)
}

fn payload_len(atom: &Atom) -> usize {
    match atom.value() {
        Value::String(s) => s.len(),
        Value::Integer(_) | Value::Float(_) => 8,
        Value::Boolean(_) => 1,
        Value::List(items) => items.iter().map(encoded_len).sum(),
        Value::Dictionary(map) => map.iter().map(|(k, v)| encoded_len(k) + encoded_len(v)).sum(),
    }
}

/// Encode an atom into a new buffer
pub fn encode(atom: &Atom) -> AtomResult<Bytes> {
    let mut buf = BytesMut::with_capacity(encoded_len(atom));
    encode_into(atom, &mut buf)?;
    Ok(buf.freeze())
}

/// Append an atom's encoding to `buf`
///
/// On error `buf` is left as it was.
pub fn encode_into(atom: &Atom, buf: &mut BytesMut) -> AtomResult<()> {
    encode_bounded(atom, buf, u32::MAX as usize)
}

/// Nested payloads are smaller than their parent's, so checking the top-level
/// payload against `limit` covers the whole tree before anything is written.
fn encode_bounded(atom: &Atom, buf: &mut BytesMut, limit: usize) -> AtomResult<()> {
    let len = payload_len(atom);
    if len > limit {
        return Err(AtomError::PayloadTooLarge { len });
    }
    buf.reserve(AtomHeader::size_for(atom.kind()) + len);
    write_atom(atom, buf);
    Ok(())
}

fn write_atom(atom: &Atom, buf: &mut BytesMut) {
    // Payload length is patched once the payload is written
    AtomHeader {
        kind: atom.kind(),
        payload_len: 0,
    }
    .serialize(buf);
    let len_at = buf.len() - LEN_FIELD_SIZE;
    let payload_start = buf.len();

    match atom.value() {
        Value::String(s) => buf.put_slice(s.as_bytes()),
        Value::Integer(i) => buf.put_i64(*i),
        Value::Float(f) => buf.put_f64(*f),
        Value::Boolean(b) => buf.put_u8(u8::from(*b)),
        Value::List(items) => {
            for item in items {
                write_atom(item, buf);
            }
        }
        Value::Dictionary(map) => {
            for (k, v) in map.iter() {
                write_atom(k, buf);
                write_atom(v, buf);
            }
        }
    }

    let written = (buf.len() - payload_start) as u32;
    buf[len_at..len_at + LEN_FIELD_SIZE].copy_from_slice(&written.to_be_bytes());
}

/// Decode exactly one atom; trailing bytes are an error
pub fn decode(buf: &[u8]) -> AtomResult<Atom> {
    Decoder::default().decode(buf)
}

/// Decode one atom from the front of `buf`
/// Returns (Atom, bytes consumed)
pub fn decode_prefix(buf: &[u8]) -> AtomResult<(Atom, usize)> {
    Decoder::default().decode_prefix(buf)
}

/// Atom decoder with configurable limits
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Self {
        Decoder { config }
    }

    #[inline]
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode exactly one atom; trailing bytes are an error
    pub fn decode(&self, buf: &[u8]) -> AtomResult<Atom> {
        let (atom, used) = self.decode_prefix(buf)?;
        if used != buf.len() {
            let err: AtomError = Malformation::TrailingBytes(buf.len() - used).into();
            debug!(error = %err, "rejected atom encoding");
            return Err(err);
        }
        Ok(atom)
    }

    /// Decode one atom from the front of `buf`
    /// Returns (Atom, bytes consumed)
    pub fn decode_prefix(&self, buf: &[u8]) -> AtomResult<(Atom, usize)> {
        self.decode_at(buf, 0).map_err(|err| {
            debug!(error = %err, len = buf.len(), "rejected atom encoding");
            err
        })
    }

    fn decode_at(&self, buf: &[u8], depth: usize) -> AtomResult<(Atom, usize)> {
        let header = AtomHeader::parse(buf)?;
        let payload_len = header.payload_len as usize;

        if payload_len > self.config.max_payload_len {
            return Err(Malformation::PayloadOverLimit {
                len: payload_len,
                limit: self.config.max_payload_len,
            }
            .into());
        }

        let start = header.size();
        let end = header.total_len();
        if buf.len() < end {
            return Err(Malformation::BufferTooShort {
                expected: end,
                actual: buf.len(),
            }
            .into());
        }
        let payload = &buf[start..end];
        if header.kind.is_container() {
            self.enter(depth)?;
        }

        let atom = match header.kind {
            Kind::String => {
                let s = std::str::from_utf8(payload).map_err(|_| Malformation::StringNotUtf8)?;
                Atom::string(s)
            }
            Kind::Integer => Atom::integer(i64::from_be_bytes(fixed(Kind::Integer, payload)?)),
            Kind::Float => {
                let f = f64::from_be_bytes(fixed(Kind::Float, payload)?);
                if f.is_nan() {
                    return Err(Malformation::NotANumber.into());
                }
                Atom::float(f)?
            }
            Kind::Boolean => match fixed::<1>(Kind::Boolean, payload)? {
                [0] => Atom::boolean(false),
                [1] => Atom::boolean(true),
                [b] => return Err(Malformation::InvalidBoolean(b).into()),
            },
            Kind::List => {
                let mut items = Vec::new();
                let mut offset = 0;
                while offset < payload.len() {
                    let (item, used) = self.decode_at(&payload[offset..], depth + 1)?;
                    items.push(item);
                    offset += used;
                }
                Atom::list(items)
            }
            Kind::Dictionary => {
                let mut map = AtomMap::new();
                let mut offset = 0;
                while offset < payload.len() {
                    let (key, used) = self.decode_at(&payload[offset..], depth + 1)?;
                    offset += used;
                    if offset == payload.len() {
                        return Err(Malformation::UnpairedKey.into());
                    }
                    let (value, used) = self.decode_at(&payload[offset..], depth + 1)?;
                    offset += used;
                    if map.insert(key, value).is_some() {
                        return Err(Malformation::DuplicateKey.into());
                    }
                }
                Atom::from(map)
            }
        };

        trace!(kind = %header.kind, payload_len, depth, "decoded atom");
        Ok((atom, end))
    }

    /// Check a container at `depth` enclosing containers may be opened
    fn enter(&self, depth: usize) -> AtomResult<()> {
        if depth >= self.config.max_depth {
            return Err(Malformation::DepthExceeded(self.config.max_depth).into());
        }
        Ok(())
    }
}

/// Fixed-width payload as an array
fn fixed<const N: usize>(kind: Kind, payload: &[u8]) -> AtomResult<[u8; N]> {
    payload.try_into().map_err(|_| {
        AtomError::MalformedEncoding(Malformation::PayloadWidth {
            kind,
            expected: N,
            actual: payload.len(),
        })
    })
}

/// Encode/decode as methods on `Atom`
pub trait AtomCodec: Sized {
    fn encode(&self) -> AtomResult<Bytes>;

    fn decode(buf: &[u8]) -> AtomResult<Self>;
}

impl AtomCodec for Atom {
    fn encode(&self) -> AtomResult<Bytes> {
        encode(self)
    }

    fn decode(buf: &[u8]) -> AtomResult<Self> {
        decode(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(atom: &Atom) -> Atom {
        let bytes = encode(atom).unwrap();
        assert_eq!(bytes.len(), encoded_len(atom));
        decode(&bytes).unwrap()
    }

    #[test]
    fn test_scalar_roundtrip() {
        let atoms = [
            Atom::string(""),
            Atom::string("héllo ⊤"),
            Atom::integer(0),
            Atom::integer(i64::MIN),
            Atom::integer(i64::MAX),
            Atom::float(-0.0).unwrap(),
            Atom::float(f64::INFINITY).unwrap(),
            Atom::float(3.25).unwrap(),
            Atom::boolean(true),
            Atom::boolean(false),
        ];
        for atom in &atoms {
            let decoded = roundtrip(atom);
            assert_eq!(&decoded, atom);
            assert_eq!(decoded.kind(), atom.kind());
        }
    }

    #[test]
    fn test_integer_layout() {
        let bytes = encode(&Atom::integer(-2)).unwrap();
        let mut expected = vec![0, 0, 0, 7];
        expected.extend_from_slice(b"integer");
        expected.extend_from_slice(&[0, 0, 0, 8]);
        expected.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_string_layout() {
        let bytes = encode(&Atom::string("ab")).unwrap();
        let mut expected = vec![0, 0, 0, 6];
        expected.extend_from_slice(b"string");
        expected.extend_from_slice(&[0, 0, 0, 2, b'a', b'b']);
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_nested_containers() {
        // list of dictionaries whose values are lists of integers
        let atom = Atom::list(vec![
            Atom::dictionary(vec![
                (
                    Atom::string("xs"),
                    Atom::list(vec![Atom::integer(1), Atom::integer(2)]),
                ),
                (Atom::string("ys"), Atom::list(vec![])),
            ]),
            Atom::dictionary(vec![(
                Atom::string("zs"),
                Atom::list(vec![Atom::integer(-3)]),
            )]),
        ]);
        assert_eq!(atom.depth(), 3);
        assert_eq!(roundtrip(&atom), atom);
    }

    #[test]
    fn test_dictionary_keeps_insertion_order() {
        let atom = Atom::dictionary(vec![
            (Atom::string("b"), Atom::integer(2)),
            (Atom::integer(1), Atom::boolean(true)),
            (Atom::string("a"), Atom::integer(1)),
        ]);
        let bytes = encode(&atom).unwrap();
        let decoded = decode(&bytes).unwrap();
        let keys: Vec<_> = decoded.as_dictionary().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![Atom::string("b"), Atom::integer(1), Atom::string("a")]
        );
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = encode(&Atom::list(vec![Atom::integer(7)])).unwrap();
        for cut in 0..bytes.len() {
            let err = decode(&bytes[..cut]).unwrap_err();
            assert!(err.is_malformed(), "cut at {}: {:?}", cut, err);
        }
    }

    #[test]
    fn test_declared_tag_overruns_buffer() {
        let buf = [0, 0, 0, 10, b'a', b'b', b'c'];
        assert!(matches!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::BufferTooShort { .. }))
        ));
    }

    #[test]
    fn test_wrong_fixed_width() {
        let mut buf = AtomHeader::new(Kind::Integer, 4).unwrap().to_bytes();
        buf.extend_from_slice(&[0, 0, 0, 1]);
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::PayloadWidth {
                kind: Kind::Integer,
                expected: 8,
                actual: 4,
            }))
        );
    }

    #[test]
    fn test_invalid_boolean_byte() {
        let mut buf = AtomHeader::new(Kind::Boolean, 1).unwrap().to_bytes();
        buf.push(2);
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::InvalidBoolean(2)))
        );
    }

    #[test]
    fn test_nan_payload_rejected() {
        let mut buf = AtomHeader::new(Kind::Float, 8).unwrap().to_bytes();
        buf.extend_from_slice(&f64::NAN.to_be_bytes());
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::NotANumber))
        );
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut buf = AtomHeader::new(Kind::String, 2).unwrap().to_bytes();
        buf.extend_from_slice(&[0xC3, 0x28]);
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::StringNotUtf8))
        );
    }

    #[test]
    fn test_element_overruns_parent() {
        let inner = encode(&Atom::integer(5)).unwrap();
        // Parent claims only part of the element
        let mut buf = AtomHeader::new(Kind::List, inner.len() - 1).unwrap().to_bytes();
        buf.extend_from_slice(&inner[..inner.len() - 1]);
        assert!(decode(&buf).unwrap_err().is_malformed());
    }

    #[test]
    fn test_unpaired_and_duplicate_keys() {
        let key = encode(&Atom::string("k")).unwrap();
        let value = encode(&Atom::integer(1)).unwrap();

        let mut buf = AtomHeader::new(Kind::Dictionary, key.len()).unwrap().to_bytes();
        buf.extend_from_slice(&key);
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::UnpairedKey))
        );

        let pair_len = key.len() + value.len();
        let mut buf = AtomHeader::new(Kind::Dictionary, 2 * pair_len)
            .unwrap()
            .to_bytes();
        for _ in 0..2 {
            buf.extend_from_slice(&key);
            buf.extend_from_slice(&value);
        }
        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::DuplicateKey))
        );
    }

    #[test]
    fn test_trailing_bytes() {
        let mut buf = encode(&Atom::boolean(true)).unwrap().to_vec();
        let len = buf.len();
        buf.extend_from_slice(&[9, 9]);

        assert_eq!(
            decode(&buf),
            Err(AtomError::MalformedEncoding(Malformation::TrailingBytes(2)))
        );
        let (atom, used) = decode_prefix(&buf).unwrap();
        assert_eq!(atom, Atom::boolean(true));
        assert_eq!(used, len);
    }

    #[test]
    fn test_depth_limit() {
        let mut atom = Atom::integer(1);
        for _ in 0..5 {
            atom = Atom::list(vec![atom]);
        }
        let bytes = encode(&atom).unwrap();

        let shallow = Decoder::new(DecodeConfig {
            max_depth: 4,
            ..Default::default()
        });
        assert_eq!(
            shallow.decode(&bytes),
            Err(AtomError::MalformedEncoding(Malformation::DepthExceeded(4)))
        );

        let exact = Decoder::new(DecodeConfig {
            max_depth: 5,
            ..Default::default()
        });
        assert_eq!(exact.decode(&bytes), Ok(atom));
    }

    #[test]
    fn test_payload_limit() {
        let atom = Atom::string("x".repeat(100));
        let bytes = encode(&atom).unwrap();
        let decoder = Decoder::new(DecodeConfig {
            max_payload_len: 99,
            ..Default::default()
        });
        assert_eq!(
            decoder.decode(&bytes),
            Err(AtomError::MalformedEncoding(Malformation::PayloadOverLimit {
                len: 100,
                limit: 99,
            }))
        );
    }

    #[test]
    fn test_codec_trait() {
        let atom = Atom::list(vec![Atom::string("a"), Atom::float(0.5).unwrap()]);
        let bytes = atom.encode().unwrap();
        assert_eq!(Atom::decode(&bytes), Ok(atom));
    }

    #[test]
    fn test_config_presets() {
        let default = Decoder::default();
        assert_eq!(default.config().max_depth, 64);
        assert_eq!(default.config().max_payload_len, 16 * 1024 * 1024);

        assert_eq!(
            DecodeConfig::strict(),
            DecodeConfig {
                max_depth: 16,
                max_payload_len: 64 * 1024,
            }
        );
        assert_eq!(
            DecodeConfig::permissive(),
            DecodeConfig {
                max_depth: 512,
                max_payload_len: u32::MAX as usize,
            }
        );
    }

    #[test]
    fn test_strict_and_permissive_payload_limits() {
        let len = 64 * 1024 + 1;
        let bytes = encode(&Atom::string("x".repeat(len))).unwrap();

        let strict = Decoder::new(DecodeConfig::strict());
        assert_eq!(
            strict.decode(&bytes),
            Err(AtomError::MalformedEncoding(Malformation::PayloadOverLimit {
                len,
                limit: 64 * 1024,
            }))
        );

        let permissive = Decoder::new(DecodeConfig::permissive());
        assert_eq!(permissive.decode(&bytes).unwrap().as_str().map(str::len), Some(len));
    }

    #[test]
    fn test_permissive_depth() {
        let mut atom = Atom::boolean(true);
        for _ in 0..100 {
            atom = Atom::list(vec![atom]);
        }
        let bytes = encode(&atom).unwrap();
        assert!(Decoder::default().decode(&bytes).is_err());
        assert_eq!(Decoder::new(DecodeConfig::permissive()).decode(&bytes), Ok(atom));
    }

    #[test]
    fn test_failed_encode_leaves_buffer() {
        let mut buf = BytesMut::new();
        encode_into(&Atom::integer(1), &mut buf).unwrap();
        let before = buf.clone();

        let atom = Atom::list(vec![Atom::string("abc"), Atom::integer(2)]);
        let len = payload_len(&atom);
        assert_eq!(
            encode_bounded(&atom, &mut buf, len - 1),
            Err(AtomError::PayloadTooLarge { len })
        );
        assert_eq!(buf, before);

        encode_bounded(&atom, &mut buf, len).unwrap();
        assert_eq!(decode(&buf[before.len()..]), Ok(atom));
    }

    #[test]
    fn test_large_dictionary_decode_is_fast() {
        let n = 100_000;
        let atom = Atom::dictionary((0..n).map(|i| (Atom::integer(i), Atom::boolean(true))));
        let bytes = encode(&atom).unwrap();

        let start = std::time::Instant::now();
        let decoded = decode(&bytes).unwrap();
        let elapsed = start.elapsed();

        assert_eq!(decoded.as_dictionary().map(|m| m.len()), Some(n as usize));
        assert!(
            elapsed < std::time::Duration::from_secs(10),
            "decoding {} entries took {:?}",
            n,
            elapsed
        );
    }
}
