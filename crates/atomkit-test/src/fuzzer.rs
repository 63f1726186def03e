//! Codec fuzzer - random atoms and corrupted encodings
//!
//! Checks:
//! - Every generated atom round-trips
//! - Re-encoding a decoded atom reproduces the original bytes
//! - Corrupted buffers either fail with a malformed-encoding error or decode
//!   to an atom that itself round-trips; they never yield any other error

use atomkit_core::{Atom, AtomError};
use atomkit_wire::{decode, encode, Decoder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Atoms to generate
    pub atom_count: usize,
    /// Maximum container nesting of generated atoms
    pub max_depth: usize,
    /// Maximum elements per generated container
    pub max_width: usize,
    /// Corrupted variants tried per atom
    pub mutations_per_atom: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            atom_count: 200,
            max_depth: 4,
            max_width: 5,
            mutations_per_atom: 8,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            atom_count: 50,
            max_depth: 3,
            max_width: 4,
            mutations_per_atom: 4,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            atom_count: 5000,
            max_depth: 6,
            max_width: 8,
            mutations_per_atom: 32,
            seed: 42,
        }
    }
}

/// Corruption applied to an encoded buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Drop bytes from the end
    Truncate,
    /// Flip bits of one byte
    FlipByte,
    /// Append garbage
    Extend,
    /// Overwrite a length field position with a large value
    InflateLength,
}

/// Outcome of a fuzz run
#[derive(Clone, Debug, Default)]
pub struct FuzzResult {
    pub atoms_generated: u64,
    pub roundtrip_failures: u64,
    pub reencode_mismatches: u64,
    pub mutations_tried: u64,
    pub mutations_rejected: u64,
    pub mutations_accepted: u64,
    /// Corrupted inputs that failed with something other than a malformed encoding
    pub unexpected_errors: Vec<AtomError>,
}

impl FuzzResult {
    pub fn new() -> Self {
        FuzzResult::default()
    }

    /// All invariants held
    pub fn passed(&self) -> bool {
        self.roundtrip_failures == 0
            && self.reencode_mismatches == 0
            && self.unexpected_errors.is_empty()
    }
}

/// Codec fuzzer
pub struct CodecFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
    decoder: Decoder,
}

impl CodecFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        CodecFuzzer {
            config,
            rng,
            decoder: Decoder::default(),
        }
    }

    /// Generate a random atom
    pub fn generate_atom(&mut self) -> Atom {
        let depth = self.config.max_depth;
        self.generate_at(depth)
    }

    fn generate_at(&mut self, depth: usize) -> Atom {
        let choices = if depth == 0 { 4 } else { 6 };
        match self.rng.gen_range(0..choices) {
            0 => {
                let len = self.rng.gen_range(0..12);
                let s: String = (0..len)
                    .map(|_| self.rng.gen_range('a'..='z'))
                    .collect();
                Atom::string(s)
            }
            1 => Atom::integer(self.rng.gen()),
            2 => {
                let f: f64 = self.rng.gen_range(-1e9..1e9);
                Atom::float(f).unwrap_or_else(|_| Atom::integer(0))
            }
            3 => Atom::boolean(self.rng.gen()),
            4 => {
                let width = self.rng.gen_range(0..=self.config.max_width);
                Atom::list((0..width).map(|_| self.generate_at(depth - 1)).collect::<Vec<_>>())
            }
            _ => {
                let width = self.rng.gen_range(0..=self.config.max_width);
                let entries: Vec<(Atom, Atom)> = (0..width)
                    .map(|_| (self.generate_at(0), self.generate_at(depth - 1)))
                    .collect();
                Atom::dictionary(entries)
            }
        }
    }

    /// Apply a random corruption to a buffer
    pub fn mutate(&mut self, bytes: &[u8]) -> (Mutation, Vec<u8>) {
        let mut out = bytes.to_vec();
        let mutation = match self.rng.gen_range(0..4) {
            0 => Mutation::Truncate,
            1 => Mutation::FlipByte,
            2 => Mutation::Extend,
            _ => Mutation::InflateLength,
        };

        match mutation {
            Mutation::Truncate => {
                let keep = self.rng.gen_range(0..out.len().max(1));
                out.truncate(keep);
            }
            Mutation::FlipByte => {
                if !out.is_empty() {
                    let at = self.rng.gen_range(0..out.len());
                    out[at] ^= self.rng.gen_range(1..=u8::MAX);
                }
            }
            Mutation::Extend => {
                let extra = self.rng.gen_range(1..8);
                out.extend((0..extra).map(|_| self.rng.gen::<u8>()));
            }
            Mutation::InflateLength => {
                if out.len() >= 4 {
                    let at = self.rng.gen_range(0..=out.len() - 4);
                    out[at..at + 4].copy_from_slice(&0x7FFF_FFFFu32.to_be_bytes());
                }
            }
        }

        (mutation, out)
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::new();

        for _ in 0..self.config.atom_count {
            let atom = self.generate_atom();
            result.atoms_generated += 1;

            let bytes = match encode(&atom) {
                Ok(bytes) => bytes,
                Err(err) => {
                    result.unexpected_errors.push(err);
                    continue;
                }
            };

            match decode(&bytes) {
                Ok(decoded) if decoded == atom => {
                    if encode(&decoded).ok().as_ref() != Some(&bytes) {
                        result.reencode_mismatches += 1;
                    }
                }
                _ => result.roundtrip_failures += 1,
            }

            for _ in 0..self.config.mutations_per_atom {
                let (_, corrupted) = self.mutate(&bytes);
                result.mutations_tried += 1;
                self.check_corrupted(&corrupted, &mut result);
            }
        }

        result
    }

    fn check_corrupted(&self, corrupted: &[u8], result: &mut FuzzResult) {
        match self.decoder.decode(corrupted) {
            Ok(atom) => {
                result.mutations_accepted += 1;
                let stable = encode(&atom)
                    .ok()
                    .and_then(|b| decode(&b).ok())
                    .map_or(false, |again| again == atom);
                if !stable {
                    result.roundtrip_failures += 1;
                }
            }
            Err(err) if err.is_malformed() => result.mutations_rejected += 1,
            Err(err) => result.unexpected_errors.push(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_fuzz() {
        let mut fuzzer = CodecFuzzer::new(FuzzerConfig::light());
        let result = fuzzer.run();

        assert!(result.passed(), "{:?}", result);
        assert_eq!(result.atoms_generated, 50);
        assert_eq!(result.mutations_tried, 200);
        assert_eq!(
            result.mutations_rejected + result.mutations_accepted,
            result.mutations_tried
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut a = CodecFuzzer::new(FuzzerConfig::light());
        let mut b = CodecFuzzer::new(FuzzerConfig::light());
        for _ in 0..10 {
            assert_eq!(a.generate_atom(), b.generate_atom());
        }
    }

    #[test]
    fn test_generated_depth_bounded() {
        let config = FuzzerConfig {
            max_depth: 2,
            ..FuzzerConfig::light()
        };
        let mut fuzzer = CodecFuzzer::new(config);
        for _ in 0..50 {
            assert!(fuzzer.generate_atom().depth() <= 2);
        }
    }

    #[test]
    fn test_truncation_shortens() {
        let mut fuzzer = CodecFuzzer::new(FuzzerConfig::light());
        let bytes = encode(&Atom::string("payload")).unwrap();
        for _ in 0..20 {
            let (mutation, out) = fuzzer.mutate(&bytes);
            if mutation == Mutation::Truncate {
                assert!(out.len() < bytes.len());
            }
        }
    }
}
