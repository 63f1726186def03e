//! JSON bridge
//!
//! Builds atoms from dynamically shaped JSON documents. This is where kind
//! inference from runtime shape happens:
//! - string -> string
//! - bool -> boolean (before any numeric check)
//! - number representable as i64 -> integer
//! - other finite number -> float
//! - array -> list
//! - object -> dictionary with string keys
//!
//! `null` and integers outside the i64 range have no atom kind.

use serde_json::{Map, Number, Value as Json};

use crate::{Atom, AtomError, AtomResult, Value};

impl TryFrom<Json> for Atom {
    type Error = AtomError;

    fn try_from(json: Json) -> AtomResult<Self> {
        match json {
            Json::String(s) => Ok(Atom::string(s)),
            Json::Bool(b) => Ok(Atom::boolean(b)),
            Json::Number(n) => number_to_atom(&n),
            Json::Array(items) => items
                .into_iter()
                .map(Atom::try_from)
                .collect::<AtomResult<Vec<_>>>()
                .map(Atom::list),
            Json::Object(map) => map
                .into_iter()
                .map(|(k, v)| Ok((Atom::string(k), Atom::try_from(v)?)))
                .collect::<AtomResult<Vec<_>>>()
                .map(Atom::dictionary),
            Json::Null => Err(AtomError::UnsupportedType("null".into())),
        }
    }
}

fn number_to_atom(n: &Number) -> AtomResult<Atom> {
    if let Some(i) = n.as_i64() {
        return Ok(Atom::integer(i));
    }
    if n.is_u64() {
        return Err(AtomError::UnsupportedType(format!(
            "integer {} out of i64 range",
            n
        )));
    }
    match n.as_f64() {
        Some(f) => Atom::float(f),
        None => Err(AtomError::UnsupportedType(format!("number {}", n))),
    }
}

impl Atom {
    /// Parse a JSON document into an atom
    pub fn from_json_str(s: &str) -> AtomResult<Self> {
        let json: Json = serde_json::from_str(s)
            .map_err(|e| AtomError::UnsupportedType(format!("invalid JSON: {}", e)))?;
        Atom::try_from(json)
    }

    /// Convert to JSON; dictionary keys must be strings and floats finite
    pub fn to_json(&self) -> AtomResult<Json> {
        match self.value() {
            Value::String(s) => Ok(Json::String(s.clone())),
            Value::Integer(i) => Ok(Json::from(*i)),
            Value::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| AtomError::UnsupportedType(format!("float {} in JSON", f))),
            Value::Boolean(b) => Ok(Json::Bool(*b)),
            Value::List(items) => items
                .iter()
                .map(Atom::to_json)
                .collect::<AtomResult<Vec<_>>>()
                .map(Json::Array),
            Value::Dictionary(map) => {
                let mut object = Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    let key = k.as_str().ok_or_else(|| {
                        AtomError::UnsupportedType(format!("{} dictionary key in JSON", k.kind()))
                    })?;
                    object.insert(key.to_owned(), v.to_json()?);
                }
                Ok(Json::Object(object))
            }
        }
    }
}
