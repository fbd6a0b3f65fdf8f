use core::cell::OnceCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::Rc;

use conform_reflect::derive::Reflect;
use conform_reflect::policy::Strict;
use conform_reflect::ser::Serializer;
use conform_reflect::value::Value;
use conform_reflect::{ErrorKind, Result};

// -----------------------------------------------------------------------------
// Shared instances

static VISITS: AtomicUsize = AtomicUsize::new(0);

fn count_visit(value: &String) -> Result<Value> {
    VISITS.fetch_add(1, Ordering::SeqCst);
    Ok(Value::from(value.as_str()))
}

#[derive(Reflect)]
struct Credentials {
    #[reflect(serialize_with = count_visit)]
    user: String,
}

#[derive(Reflect)]
struct Cluster {
    primary: Rc<Credentials>,
    replica: Rc<Credentials>,
}

#[test]
fn shared_instances_are_duplicated() {
    let shared = Rc::new(Credentials { user: "admin".into() });
    let cluster = Cluster {
        primary: Rc::clone(&shared),
        replica: shared,
    };

    VISITS.store(0, Ordering::SeqCst);
    let reused = Serializer::new(&Strict).serialize(&cluster).unwrap();
    assert_eq!(VISITS.load(Ordering::SeqCst), 1);

    VISITS.store(0, Ordering::SeqCst);
    let walked = Serializer::new(&Strict).reuse(false).serialize(&cluster).unwrap();
    assert_eq!(VISITS.load(Ordering::SeqCst), 2);

    assert_eq!(reused, walked);
    let map = reused.as_map().unwrap();
    assert_eq!(map.get("primary"), map.get("replica"));
}

// -----------------------------------------------------------------------------
// Cycles

#[derive(Reflect)]
struct Node {
    name: String,
    next: OnceCell<Rc<Node>>,
}

fn ring() -> Rc<Node> {
    let head = Rc::new(Node {
        name: "head".into(),
        next: OnceCell::new(),
    });
    let tail = Rc::new(Node {
        name: "tail".into(),
        next: OnceCell::from(Rc::clone(&head)),
    });
    let _ = head.next.set(tail);
    head
}

#[test]
fn acyclic_chain_serializes() {
    let tail = Rc::new(Node {
        name: "tail".into(),
        next: OnceCell::new(),
    });
    let head = Node {
        name: "head".into(),
        next: OnceCell::from(tail),
    };
    let value = Serializer::new(&Strict).serialize(&head).unwrap();
    let next = value.as_map().unwrap().get("next").unwrap();
    assert_eq!(next.as_map().unwrap().get("next"), Some(&Value::Null));
}

#[test]
fn cycle_is_reported_with_reuse() {
    let head = ring();
    let err = Serializer::new(&Strict).serialize(&*head).unwrap_err();
    match err.kind() {
        ErrorKind::CyclicReference { class } => assert!(class.ends_with("Node")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.path().to_string(), "next.next");
}

#[test]
fn cycle_hits_the_depth_limit_without_reuse() {
    let head = ring();
    let err = Serializer::new(&Strict)
        .reuse(false)
        .max_depth(16)
        .serialize(&*head)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DepthExceeded { limit: 16 }));
}

#[test]
fn serializer_is_reusable_after_an_error() {
    let head = ring();
    let mut ser = Serializer::new(&Strict);
    assert!(ser.serialize(&*head).is_err());

    let single = Node {
        name: "solo".into(),
        next: OnceCell::new(),
    };
    assert!(ser.serialize(&single).is_ok());
}
