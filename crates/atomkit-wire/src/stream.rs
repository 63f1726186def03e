//! Sequences of atoms encoded back to back

use atomkit_core::{Atom, AtomResult};
use bytes::{Bytes, BytesMut};

use crate::{encode_into, encoded_len, Decoder};

/// Concatenate the encodings of several atoms
pub fn encode_all<'a>(atoms: impl IntoIterator<Item = &'a Atom>) -> AtomResult<Bytes> {
    let mut buf = BytesMut::new();
    for atom in atoms {
        buf.reserve(encoded_len(atom));
        encode_into(atom, &mut buf)?;
    }
    Ok(buf.freeze())
}

/// Decode every atom in `buf`; fails on the first malformed one
pub fn decode_all(buf: &[u8]) -> AtomResult<Vec<Atom>> {
    AtomStream::new(buf).collect()
}

/// Iterator over back-to-back atoms in a buffer
///
/// Stops after the first error.
pub struct AtomStream<'a> {
    buf: &'a [u8],
    offset: usize,
    decoder: Decoder,
    failed: bool,
}

impl<'a> AtomStream<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        AtomStream::with_decoder(buf, Decoder::default())
    }

    pub fn with_decoder(buf: &'a [u8], decoder: Decoder) -> Self {
        AtomStream {
            buf,
            offset: 0,
            decoder,
            failed: false,
        }
    }

    /// Bytes consumed so far
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }
}

impl<'a> Iterator for AtomStream<'a> {
    type Item = AtomResult<Atom>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }
        match self.decoder.decode_prefix(self.remaining()) {
            Ok((atom, used)) => {
                self.offset += used;
                Some(Ok(atom))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
