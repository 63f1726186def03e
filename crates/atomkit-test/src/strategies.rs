//! Proptest strategies for atoms

use atomkit_core::Atom;
use proptest::prelude::*;

/// Any finite-or-infinite non-NaN float atom
pub fn float_atom() -> impl Strategy<Value = Atom> {
    any::<f64>()
        .prop_filter("NaN is not a float atom", |f| !f.is_nan())
        .prop_map(|f| Atom::float(f).expect("NaN filtered"))
}

/// Any scalar atom
pub fn scalar_atom() -> impl Strategy<Value = Atom> {
    prop_oneof![
        ".{0,16}".prop_map(Atom::string),
        any::<i64>().prop_map(Atom::integer),
        float_atom(),
        any::<bool>().prop_map(Atom::boolean),
    ]
}

/// Atoms nested up to `depth` containers
pub fn atom(depth: u32) -> impl Strategy<Value = Atom> {
    scalar_atom().prop_recursive(depth, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Atom::list),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(Atom::dictionary),
        ]
    })
}

/// Atoms up to depth 4
pub fn any_atom() -> impl Strategy<Value = Atom> {
    atom(4)
}

/// List of dictionaries whose values are lists of integers
pub fn table_atom() -> impl Strategy<Value = Atom> {
    let row = prop::collection::vec(
        (
            "[a-z]{1,6}".prop_map(Atom::string),
            prop::collection::vec(any::<i64>().prop_map(Atom::integer), 0..5).prop_map(Atom::list),
        ),
        0..4,
    )
    .prop_map(Atom::dictionary);
    prop::collection::vec(row, 0..4).prop_map(Atom::list)
}
