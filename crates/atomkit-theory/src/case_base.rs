//! Case base - named selection strategies
//!
//! A case base maps a small fixed set of symbols to binary selectors, so a
//! caller can pick "take the left operand" by name instead of branching
//! inline:
//! - `⊤` selects the first argument
//! - `⊥` selects the second argument
//! - `a` selects the first argument through an explicit true branch

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Binary selection strategy
pub type Selector<T> = for<'a> fn(&'a T, &'a T) -> &'a T;

/// Case base key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseSymbol {
    /// `⊤`
    Top,
    /// `⊥`
    Bottom,
    /// `a`
    Assert,
}

impl CaseSymbol {
    pub const ALL: [CaseSymbol; 3] = [CaseSymbol::Top, CaseSymbol::Bottom, CaseSymbol::Assert];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            CaseSymbol::Top => "⊤",
            CaseSymbol::Bottom => "⊥",
            CaseSymbol::Assert => "a",
        }
    }
}

impl fmt::Display for CaseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "⊤" => Ok(CaseSymbol::Top),
            "⊥" => Ok(CaseSymbol::Bottom),
            "a" => Ok(CaseSymbol::Assert),
            _ => Err(UnknownSymbol(s.to_owned())),
        }
    }
}

/// Symbol outside the case base's key set
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case symbol: {0:?}")]
pub struct UnknownSymbol(pub String);

/// Select `x` when `cond` holds, otherwise `y`
#[inline]
pub fn branch<'a, T>(cond: bool, x: &'a T, y: &'a T) -> &'a T {
    if cond {
        x
    } else {
        y
    }
}

/// `⊤`: always the first argument
pub fn first<'a, T>(x: &'a T, _y: &'a T) -> &'a T {
    x
}

/// `⊥`: always the second argument
pub fn second<'a, T>(_x: &'a T, y: &'a T) -> &'a T {
    y
}

/// `a`: the first argument, chosen by a true branch
pub fn asserted<'a, T>(x: &'a T, y: &'a T) -> &'a T {
    branch(true, x, y)
}

/// Registry of selection strategies by symbol
pub struct CaseBase<T> {
    selectors: HashMap<CaseSymbol, Selector<T>>,
}

impl<T> CaseBase<T> {
    pub fn new() -> Self {
        let mut selectors: HashMap<CaseSymbol, Selector<T>> = HashMap::with_capacity(3);
        selectors.insert(CaseSymbol::Top, first::<T>);
        selectors.insert(CaseSymbol::Bottom, second::<T>);
        selectors.insert(CaseSymbol::Assert, asserted::<T>);
        CaseBase { selectors }
    }

    /// Replace the selector for a symbol
    pub fn set(&mut self, symbol: CaseSymbol, selector: Selector<T>) {
        self.selectors.insert(symbol, selector);
    }

    /// Selector registered for a symbol
    pub fn get(&self, symbol: CaseSymbol) -> Option<Selector<T>> {
        self.selectors.get(&symbol).copied()
    }

    /// Selector by its textual symbol (`"⊤"`, `"⊥"`, `"a"`)
    pub fn lookup(&self, symbol: &str) -> Option<Selector<T>> {
        symbol.parse().ok().and_then(|s| self.get(s))
    }

    /// Apply the selector for `symbol` to `x` and `y`
    pub fn select<'a>(&self, symbol: CaseSymbol, x: &'a T, y: &'a T) -> Option<&'a T> {
        self.get(symbol).map(|selector| selector(x, y))
    }

    pub fn symbols(&self) -> impl Iterator<Item = CaseSymbol> + '_ {
        CaseSymbol::ALL
            .into_iter()
            .filter(|s| self.selectors.contains_key(s))
    }
}

impl<T> Default for CaseBase<T> {
    fn default() -> Self {
        CaseBase::new()
    }
}

impl<T> Clone for CaseBase<T> {
    fn clone(&self) -> Self {
        CaseBase {
            selectors: self.selectors.clone(),
        }
    }
}

impl<T> fmt::Debug for CaseBase<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.symbols()).finish()
    }
}
