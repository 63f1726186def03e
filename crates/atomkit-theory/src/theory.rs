//! Formal theory - configurable equivalence over atoms
//!
//! A theory bundles the predicates that define "equivalent":
//! - reflexivity(x)
//! - symmetry(x, y), used by `compare`
//! - transitivity(x, y, z)
//! - a transparency gate deciding when a selector is applied
//!
//! plus a case base of named selectors. Every predicate defaults to value
//! equality and can be replaced through `FormalTheoryBuilder`.

use std::fmt;
use std::sync::Arc;

use atomkit_core::Atom;
use tracing::trace;

use crate::{CaseBase, CaseSymbol, Selector};

pub type Reflexivity<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub type Symmetry<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;
pub type Transitivity<T> = Arc<dyn Fn(&T, &T, &T) -> bool + Send + Sync>;

/// Equivalence facility
pub struct FormalTheory<T = Atom> {
    reflexivity: Reflexivity<T>,
    symmetry: Symmetry<T>,
    transitivity: Transitivity<T>,
    transparency: Symmetry<T>,
    case_base: CaseBase<T>,
}

impl<T: PartialEq + 'static> FormalTheory<T> {
    /// Theory with every predicate set to value equality
    pub fn new() -> Self {
        FormalTheoryBuilder::new().build()
    }

    pub fn builder() -> FormalTheoryBuilder<T> {
        FormalTheoryBuilder::new()
    }
}

impl<T: PartialEq + 'static> Default for FormalTheory<T> {
    fn default() -> Self {
        FormalTheory::new()
    }
}

impl<T> FormalTheory<T> {
    /// True iff every item is equivalent to the first under `symmetry`
    ///
    /// Empty input is `false`; a single item is trivially `true`.
    pub fn compare(&self, items: &[T]) -> bool {
        let Some((first, rest)) = items.split_first() else {
            return false;
        };
        for (i, other) in rest.iter().enumerate() {
            if !(self.symmetry)(first, other) {
                trace!(index = i + 1, len = items.len(), "equivalence broken");
                return false;
            }
        }
        true
    }

    #[inline]
    pub fn reflexivity(&self, x: &T) -> bool {
        (self.reflexivity)(x)
    }

    #[inline]
    pub fn symmetry(&self, x: &T, y: &T) -> bool {
        (self.symmetry)(x, y)
    }

    #[inline]
    pub fn transitivity(&self, x: &T, y: &T, z: &T) -> bool {
        (self.transitivity)(x, y, z)
    }

    /// Apply `f(true, x, y)` when the transparency gate admits `x` and `y`
    pub fn transparency<'a, R>(
        &self,
        f: impl FnOnce(bool, &'a T, &'a T) -> R,
        x: &'a T,
        y: &'a T,
    ) -> Option<R> {
        if (self.transparency)(x, y) {
            Some(f(true, x, y))
        } else {
            None
        }
    }

    #[inline]
    pub fn case_base(&self) -> &CaseBase<T> {
        &self.case_base
    }

    /// Selector registered under a textual symbol
    pub fn case(&self, symbol: &str) -> Option<Selector<T>> {
        self.case_base.lookup(symbol)
    }

    /// Partition items into equivalence classes under `symmetry`
    ///
    /// Each class is a list of indices; an item joins the first class whose
    /// representative (its first member) it is equivalent to.
    pub fn classes(&self, items: &[T]) -> Vec<Vec<usize>> {
        let mut classes: Vec<Vec<usize>> = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match classes
                .iter_mut()
                .find(|class| (self.symmetry)(&items[class[0]], item))
            {
                Some(class) => class.push(i),
                None => classes.push(vec![i]),
            }
        }
        classes
    }
}

impl<T> Clone for FormalTheory<T> {
    fn clone(&self) -> Self {
        FormalTheory {
            reflexivity: Arc::clone(&self.reflexivity),
            symmetry: Arc::clone(&self.symmetry),
            transitivity: Arc::clone(&self.transitivity),
            transparency: Arc::clone(&self.transparency),
            case_base: self.case_base.clone(),
        }
    }
}

impl<T> fmt::Debug for FormalTheory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormalTheory")
            .field("case_base", &self.case_base)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::eq_op)]
fn reflexive<T: PartialEq>(x: &T) -> bool {
    x == x
}

/// Builder for `FormalTheory`
pub struct FormalTheoryBuilder<T> {
    theory: FormalTheory<T>,
}

impl<T: PartialEq + 'static> FormalTheoryBuilder<T> {
    pub fn new() -> Self {
        FormalTheoryBuilder {
            theory: FormalTheory {
                reflexivity: Arc::new(reflexive::<T>),
                symmetry: Arc::new(|x: &T, y: &T| x == y),
                transitivity: Arc::new(|x: &T, y: &T, z: &T| x == y && y == z && x == z),
                transparency: Arc::new(|x: &T, y: &T| x == y),
                case_base: CaseBase::new(),
            },
        }
    }
}

impl<T: PartialEq + 'static> Default for FormalTheoryBuilder<T> {
    fn default() -> Self {
        FormalTheoryBuilder::new()
    }
}

impl<T> FormalTheoryBuilder<T> {
    pub fn reflexivity(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.theory.reflexivity = Arc::new(f);
        self
    }

    pub fn symmetry(mut self, f: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        self.theory.symmetry = Arc::new(f);
        self
    }

    pub fn transitivity(mut self, f: impl Fn(&T, &T, &T) -> bool + Send + Sync + 'static) -> Self {
        self.theory.transitivity = Arc::new(f);
        self
    }

    /// Gate deciding when `transparency` applies its selector
    pub fn transparency(mut self, f: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        self.theory.transparency = Arc::new(f);
        self
    }

    pub fn case(mut self, symbol: CaseSymbol, selector: Selector<T>) -> Self {
        self.theory.case_base.set(symbol, selector);
        self
    }

    pub fn build(self) -> FormalTheory<T> {
        self.theory
    }
}
