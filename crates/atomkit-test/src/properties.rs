//! End-to-end properties of the atom format and the equivalence facility
//!
//! Each check returns `Ok(())` or a description of the first failure so it
//! can back both proptest cases and ad hoc harnesses.

use atomkit_core::{Atom, AtomResult};
use atomkit_theory::FormalTheory;
use atomkit_wire::{decode, encode};

/// `decode(encode(a)) == a`, with the same kind
pub fn roundtrip(atom: &Atom) -> Result<(), String> {
    let decoded = encode_decode(atom).map_err(|e| format!("{} failed: {}", atom, e))?;
    if decoded != *atom {
        return Err(format!("{} decoded as {}", atom, decoded));
    }
    if decoded.kind() != atom.kind() {
        return Err(format!("{} changed kind to {}", atom, decoded.kind()));
    }
    Ok(())
}

/// `encode(decode(encode(a))) == encode(a)` byte for byte
pub fn stable_reencode(atom: &Atom) -> Result<(), String> {
    let once = encode(atom).map_err(|e| e.to_string())?;
    let decoded = decode(&once).map_err(|e| e.to_string())?;
    let twice = encode(&decoded).map_err(|e| e.to_string())?;
    if once != twice {
        return Err(format!("re-encoding {} changed {} bytes", atom, once.len()));
    }
    Ok(())
}

/// A decoded copy is equivalent to its source under the default theory
pub fn decoded_equivalent(atom: &Atom) -> Result<(), String> {
    let decoded = encode_decode(atom).map_err(|e| e.to_string())?;
    let theory = FormalTheory::<Atom>::new();
    if !theory.compare(&[atom.clone(), decoded]) {
        return Err(format!("{} not equivalent to its decoded copy", atom));
    }
    Ok(())
}

fn encode_decode(atom: &Atom) -> AtomResult<Atom> {
    decode(&encode(atom)?)
}
