//! Atom definitions
//!
//! An atom is an immutable tagged value. Its kind is never stored separately:
//! it is read off the `Value` variant, so the two cannot disagree.
//!
//! Atoms compare by value. Float payloads are never NaN, which makes equality
//! a true equivalence relation and lets `Atom` implement `Eq` and `Hash`.
//! A bare `Value` carries no such guarantee and is only `PartialEq`.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::{AtomError, AtomResult, Kind};

/// Payload of an atom
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<Atom>),
    Dictionary(AtomMap),
}

impl Value {
    /// Kind tag for this payload
    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Boolean(_) => Kind::Boolean,
            Value::List(_) => Kind::List,
            Value::Dictionary(_) => Kind::Dictionary,
        }
    }
}

/// Hashing agrees with `==`: `-0.0` hashes as `0.0` and dictionaries hash
/// independently of entry order.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state);
            }
            Value::Boolean(b) => b.hash(state),
            Value::List(items) => items.hash(state),
            Value::Dictionary(map) => map.hash(state),
        }
    }
}

/// Immutable tagged value
#[derive(Clone, Debug, PartialEq, Hash)]
pub struct Atom {
    value: Value,
}

// Every constructor rejects NaN, so `==` is reflexive.
impl Eq for Atom {}

impl Atom {
    /// Wrap a payload, rejecting NaN floats
    pub fn new(value: Value) -> AtomResult<Self> {
        if let Value::Float(f) = value {
            if f.is_nan() {
                return Err(AtomError::UnsupportedType("NaN float".into()));
            }
        }
        Ok(Atom { value })
    }

    pub fn string(s: impl Into<String>) -> Self {
        Atom {
            value: Value::String(s.into()),
        }
    }

    pub fn integer(i: i64) -> Self {
        Atom {
            value: Value::Integer(i),
        }
    }

    /// Float atom; NaN is rejected
    pub fn float(f: f64) -> AtomResult<Self> {
        Atom::new(Value::Float(f))
    }

    pub fn boolean(b: bool) -> Self {
        Atom {
            value: Value::Boolean(b),
        }
    }

    pub fn list(items: impl IntoIterator<Item = Atom>) -> Self {
        Atom {
            value: Value::List(items.into_iter().collect()),
        }
    }

    /// Dictionary atom; a repeated key keeps its first position and its last value
    pub fn dictionary(entries: impl IntoIterator<Item = (Atom, Atom)>) -> Self {
        Atom {
            value: Value::Dictionary(entries.into_iter().collect()),
        }
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self.value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Atom]> {
        match &self.value {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&AtomMap> {
        match &self.value {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Container nesting depth (scalars are 0)
    pub fn depth(&self) -> usize {
        match &self.value {
            Value::List(items) => 1 + items.iter().map(Atom::depth).max().unwrap_or(0),
            Value::Dictionary(map) => {
                1 + map
                    .iter()
                    .map(|(k, v)| k.depth().max(v.depth()))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl From<i64> for Atom {
    fn from(i: i64) -> Self {
        Atom::integer(i)
    }
}

impl From<bool> for Atom {
    fn from(b: bool) -> Self {
        Atom::boolean(b)
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::string(s)
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::string(s)
    }
}

impl From<Vec<Atom>> for Atom {
    fn from(items: Vec<Atom>) -> Self {
        Atom::list(items)
    }
}

impl From<AtomMap> for Atom {
    fn from(map: AtomMap) -> Self {
        Atom {
            value: Value::Dictionary(map),
        }
    }
}

impl TryFrom<f64> for Atom {
    type Error = AtomError;

    fn try_from(f: f64) -> AtomResult<Self> {
        Atom::float(f)
    }
}

impl TryFrom<Value> for Atom {
    type Error = AtomError;

    fn try_from(value: Value) -> AtomResult<Self> {
        Atom::new(value)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Dictionary(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Insertion-ordered map from atom keys to atom values
///
/// Keys are unique. Equality ignores insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtomMap {
    entries: IndexMap<Atom, Atom>,
}

impl AtomMap {
    pub fn new() -> Self {
        AtomMap::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AtomMap {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert an entry, returning the previous value for the key
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, key: Atom, value: Atom) -> Option<Atom> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &Atom) -> Option<&Atom> {
        self.entries.get(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &Atom)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Atom> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Atom> {
        self.entries.values()
    }
}

impl Hash for AtomMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entry hashes are combined with a commutative sum
        let combined = self.entries.iter().fold(0u64, |acc, entry| {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.len().hash(state);
        combined.hash(state);
    }
}

impl FromIterator<(Atom, Atom)> for AtomMap {
    fn from_iter<I: IntoIterator<Item = (Atom, Atom)>>(iter: I) -> Self {
        AtomMap {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AtomMap {
    type Item = (Atom, Atom);
    type IntoIter = indexmap::map::IntoIter<Atom, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
