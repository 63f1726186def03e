//! atomkit test harness - Property testing and fuzzing
//!
//! This crate provides:
//! - Proptest strategies for atoms of bounded depth
//! - End-to-end codec and equivalence properties
//! - A seeded codec fuzzer with corrupted-buffer checks

pub mod fuzzer;
pub mod properties;
pub mod strategies;

pub use fuzzer::*;
pub use properties::*;
pub use strategies::*;
