//! Law checking
//!
//! Evaluates a theory's configured predicates over a finite sample and
//! records every counterexample. The triple scan is cubic in the sample
//! size, so samples should stay small.

use tracing::debug;

use crate::FormalTheory;

/// Counterexamples found by `FormalTheory::check_laws`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LawReport {
    /// Items for which `reflexivity(x)` is false
    pub reflexivity: Vec<usize>,
    /// Pairs where `symmetry(x, y) != symmetry(y, x)`
    pub symmetry: Vec<(usize, usize)>,
    /// Triples with `x ~ y` and `y ~ z` where `transitivity(x, y, z)` is false
    pub transitivity: Vec<(usize, usize, usize)>,
    /// Items examined
    pub sample_size: usize,
}

impl LawReport {
    /// No counterexample was found
    pub fn holds(&self) -> bool {
        self.reflexivity.is_empty() && self.symmetry.is_empty() && self.transitivity.is_empty()
    }

    pub fn violations(&self) -> usize {
        self.reflexivity.len() + self.symmetry.len() + self.transitivity.len()
    }
}

impl<T> FormalTheory<T> {
    /// Check reflexivity, symmetry and transitivity over `sample`
    pub fn check_laws(&self, sample: &[T]) -> LawReport {
        let n = sample.len();
        let mut report = LawReport {
            sample_size: n,
            ..Default::default()
        };

        for (i, x) in sample.iter().enumerate() {
            if !self.reflexivity(x) {
                report.reflexivity.push(i);
            }
        }

        // related[i][j] = symmetry(sample[i], sample[j])
        let related: Vec<Vec<bool>> = sample
            .iter()
            .map(|x| sample.iter().map(|y| self.symmetry(x, y)).collect())
            .collect();

        for i in 0..n {
            for j in (i + 1)..n {
                if related[i][j] != related[j][i] {
                    report.symmetry.push((i, j));
                }
            }
        }

        for i in 0..n {
            for j in 0..n {
                if !related[i][j] {
                    continue;
                }
                for k in 0..n {
                    if related[j][k] && !self.transitivity(&sample[i], &sample[j], &sample[k]) {
                        report.transitivity.push((i, j, k));
                    }
                }
            }
        }

        debug!(
            sample_size = n,
            violations = report.violations(),
            "checked equivalence laws"
        );
        report
    }
}
