//! atomctl subcommands
//!
//! Each command takes its textual input and returns the text to print, so
//! the binary only handles argument parsing and I/O.

use anyhow::{bail, Context, Result};
use atomkit_core::Atom;
use atomkit_theory::FormalTheory;
use atomkit_wire::{encode, Decoder};
use tracing::{debug, info};

/// JSON document -> hex encoding
pub fn encode_json(input: &str) -> Result<String> {
    let atom = Atom::from_json_str(input.trim()).context("input is not a valid atom")?;
    let bytes = encode(&atom)?;
    debug!(kind = %atom.kind(), len = bytes.len(), "encoded atom");
    Ok(hex::encode(&bytes))
}

/// Hex encoding -> "<kind> <json>"
///
/// Atoms with non-string dictionary keys have no JSON form and are printed
/// in display notation instead.
pub fn decode_hex(input: &str, decoder: &Decoder) -> Result<String> {
    let bytes = hex::decode(input.trim()).context("input is not valid hex")?;
    let atom = decoder.decode(&bytes).context("input is not a valid atom encoding")?;
    let rendered = match atom.to_json() {
        Ok(json) => json.to_string(),
        Err(err) => {
            debug!(error = %err, "falling back to display notation");
            atom.to_string()
        }
    };
    Ok(format!("{} {}", atom.kind(), rendered))
}

/// JSON array -> whether every element is equivalent to the first
pub fn compare_json(input: &str) -> Result<String> {
    let atom = Atom::from_json_str(input.trim()).context("input is not a valid atom")?;
    let Some(items) = atom.as_list() else {
        bail!("compare expects a JSON array, got {}", atom.kind());
    };

    let theory = FormalTheory::<Atom>::new();
    let equivalent = theory.compare(items);
    info!(count = items.len(), equivalent, "compared atoms");
    Ok(equivalent.to_string())
}
