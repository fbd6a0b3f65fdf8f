use core::any::TypeId;

use conform_reflect::de::Deserializer;
use conform_reflect::derive::Reflect;
use conform_reflect::policy::{Coerce, Strict};
use conform_reflect::registry::{TypeRegistry, global, to_envelope};
use conform_reflect::ser::Serializer;
use conform_reflect::value::{Mapping, Value};
use conform_reflect::{ErrorKind, Reflect};

#[derive(Reflect, Debug, PartialEq)]
#[reflect(auto_register)]
struct Deploy {
    image: String,
    replicas: u8,
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(auto_register, tag = "kind")]
enum Trigger {
    Manual,
    Cron { schedule: String },
}

mod staging {
    use conform_reflect::derive::Reflect;

    #[derive(Reflect, Debug, PartialEq)]
    pub struct Deploy {
        pub image: String,
    }
}

#[test]
fn auto_registered_types_are_found() {
    let mut registry = TypeRegistry::empty();
    if !registry.auto_register() {
        return;
    }
    assert!(registry.contains(TypeId::of::<Deploy>()));
    assert!(registry.contains(TypeId::of::<Trigger>()));
    assert!(!registry.contains(TypeId::of::<staging::Deploy>()));

    let len = registry.len();
    assert!(registry.auto_register());
    assert_eq!(registry.len(), len);
}

#[test]
fn envelope_round_trip() {
    let deploy = Deploy {
        image: "app:1.2".into(),
        replicas: 3,
    };
    let envelope = to_envelope(&deploy, &mut Serializer::new(&Strict)).unwrap();
    let (key, inner) = envelope.as_map().unwrap().iter().next().unwrap();
    assert!(key.ends_with("::Deploy"));
    assert_eq!(inner.as_map().unwrap().get("replicas"), Some(&Value::Int(3)));

    let mut registry = TypeRegistry::new();
    registry.register::<Deploy>();
    let back = registry
        .from_envelope(&envelope, &mut Deserializer::new(&Strict))
        .unwrap();
    assert!(back.is::<Deploy>());
    assert_eq!(back.take::<Deploy>(), Some(deploy));
}

#[test]
fn envelope_of_a_union() {
    let trigger = Trigger::Cron {
        schedule: "0 * * * *".into(),
    };
    let envelope = to_envelope(&trigger, &mut Serializer::new(&Strict)).unwrap();

    let registry = global().read();
    if registry.get(TypeId::of::<Trigger>()).is_none() {
        return;
    }
    let back = registry
        .from_envelope(&envelope, &mut Deserializer::new(&Strict))
        .unwrap();
    assert_eq!(back.downcast_ref::<Trigger>(), Some(&trigger));
}

#[test]
fn ambiguous_short_names_need_the_full_path() {
    let mut registry = TypeRegistry::empty();
    registry.register::<Deploy>();
    registry.register::<staging::Deploy>();
    assert!(registry.is_ambiguous("Deploy"));

    let mut inner = Mapping::new();
    inner.insert("image", Value::from("x"));

    let mut by_name = Mapping::new();
    by_name.insert("Deploy", Value::Map(inner.clone()));
    let err = registry
        .from_envelope(&Value::Map(by_name), &mut Deserializer::new(&Coerce))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnresolvedType { name } if name == "Deploy"));

    let staging = staging::Deploy { image: "x".into() };
    let path = staging.reflect_type_info().type_path();
    let mut by_path = Mapping::new();
    by_path.insert(path, Value::Map(inner));
    let back = registry
        .from_envelope(&Value::Map(by_path), &mut Deserializer::new(&Coerce))
        .unwrap();
    assert_eq!(back.take::<staging::Deploy>(), Some(staging));
}

#[test]
fn envelope_errors_are_located_under_the_key() {
    let mut registry = TypeRegistry::new();
    registry.register::<Deploy>();

    let mut inner = Mapping::new();
    inner.insert("image", Value::from("x"));
    inner.insert("replicas", Value::from("many"));
    let mut envelope = Mapping::new();
    envelope.insert("Deploy", Value::Map(inner));

    let err = registry
        .from_envelope(&Value::Map(envelope), &mut Deserializer::new(&Coerce))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
    assert_eq!(err.path().to_string(), r#"["Deploy"].replicas"#);
}
