use conform_reflect::de::Deserializer;
use conform_reflect::derive::Reflect;
use conform_reflect::policy::{Coerce, Strict};
use conform_reflect::ser::Serializer;
use conform_reflect::value::{Mapping, Value};
use conform_reflect::{ErrorKind, from_representation_with, to_representation_with};

fn single(key: &str, value: Value) -> Value {
    let mut map = Mapping::new();
    map.insert(key, value);
    Value::Map(map)
}

// -----------------------------------------------------------------------------
// Newtype variants

#[derive(Reflect, Debug, PartialEq)]
#[reflect(external)]
enum Expr {
    Lit(i64),
    Neg(Box<Expr>),
}

fn negations(depth: usize) -> Expr {
    let mut expr = Expr::Lit(1);
    for _ in 0..depth {
        expr = Expr::Neg(Box::new(expr));
    }
    expr
}

fn negations_repr(depth: usize) -> Value {
    let mut value = single("Lit", Value::Int(1));
    for _ in 0..depth {
        value = single("Neg", value);
    }
    value
}

#[test]
fn newtype_payloads_count_towards_the_limit() {
    let err = Serializer::new(&Strict)
        .max_depth(16)
        .serialize(&negations(200))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));

    let err = Deserializer::new(&Coerce)
        .max_depth(16)
        .deserialize::<Expr>(&negations_repr(200))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));
}

#[test]
fn moderate_nesting_fits_the_default_limit() {
    let expr = negations(40);
    let value = to_representation_with(&expr, &Strict).unwrap();
    assert_eq!(value, negations_repr(40));
    let back: Expr = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(back, expr);
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(untagged)]
enum Term {
    Lit(i64),
    Wrapped(Box<Term>),
}

#[test]
fn untagged_self_reference_stops_at_the_limit() {
    // every `Wrapped` trial reads the same payload one level deeper
    let err = Deserializer::new(&Strict)
        .max_depth(16)
        .deserialize::<Term>(&Value::Int(1))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));

    let term: Term = Deserializer::new(&Coerce)
        .max_depth(16)
        .deserialize(&Value::Int(1))
        .unwrap();
    assert_eq!(term, Term::Lit(1));

    let mut term = Term::Lit(1);
    for _ in 0..32 {
        term = Term::Wrapped(Box::new(term));
    }
    let err = Serializer::new(&Strict)
        .max_depth(16)
        .serialize(&term)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));
}

// -----------------------------------------------------------------------------
// Optional links

#[derive(Reflect, Debug, PartialEq)]
struct Link {
    id: u32,
    next: Option<Box<Link>>,
}

fn links_repr(len: usize) -> Value {
    let mut value = Value::Null;
    for id in (0..len).rev() {
        let mut map = Mapping::new();
        map.insert("id", Value::Int(id as i64));
        map.insert("next", value);
        value = Value::Map(map);
    }
    value
}

#[test]
fn optional_chains_count_towards_the_limit() {
    let err = Deserializer::new(&Strict)
        .max_depth(16)
        .deserialize::<Link>(&links_repr(100))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));
    assert!(err.path().to_string().starts_with("next.next"));

    let mut link = Link { id: 0, next: None };
    for id in 1..100 {
        link = Link {
            id,
            next: Some(Box::new(link)),
        };
    }
    let err = Serializer::new(&Strict)
        .max_depth(16)
        .serialize(&link)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));

    let short: Link = Deserializer::new(&Strict)
        .max_depth(16)
        .deserialize(&links_repr(4))
        .unwrap();
    assert_eq!(short.next.as_ref().map(|next| next.id), Some(1));
}
