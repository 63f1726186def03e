//! atomkit wire - Binary atom encoding
//!
//! This crate implements the self-describing atom format:
//! - Per-atom header: tag length, tag, payload length (all lengths BE u32)
//! - Fixed-width scalar payloads, raw UTF-8 strings
//! - Containers as back-to-back element encodings
//! - Streams of atoms laid end to end

pub mod codec;
pub mod header;
pub mod stream;

pub use codec::*;
pub use header::*;
pub use stream::*;
