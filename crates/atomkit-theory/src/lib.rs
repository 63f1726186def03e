//! atomkit theory - Equivalence facility
//!
//! This crate decides whether a sequence of atoms is pairwise equivalent:
//! - Replaceable reflexivity / symmetry / transitivity / transparency policies
//! - A case base of named selection strategies (`⊤`, `⊥`, `a`)
//! - Equivalence classes and law checking over samples

pub mod case_base;
pub mod laws;
pub mod theory;

pub use case_base::*;
pub use laws::*;
pub use theory::*;
