//! atomkit core - Atom value model
//!
//! This crate defines the value types shared by the rest of atomkit:
//! - Atoms and their payloads (`Atom`, `Value`, `AtomMap`)
//! - The closed set of kinds and their wire tags
//! - Ordering and arithmetic as named, checked operations
//! - Error types

pub mod atom;
pub mod error;
pub mod kind;
pub mod ops;

#[cfg(feature = "json")]
pub mod json;

pub use atom::*;
pub use error::*;
pub use kind::*;
pub use ops::*;
