use conform_reflect::de::Deserializer;
use conform_reflect::derive::Reflect;
use conform_reflect::path::Segment;
use conform_reflect::policy::{Coerce, Strict};
use conform_reflect::value::{Mapping, Value};
use conform_reflect::{ErrorKind, from_representation_with, to_representation_with};

fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let mut map = Mapping::new();
    for (key, value) in entries {
        map.insert(key, value);
    }
    Value::Map(map)
}

fn field(name: &str) -> Segment {
    Segment::Field(name.into())
}

// -----------------------------------------------------------------------------
// Shapes

#[derive(Reflect, Debug, PartialEq, Clone)]
struct Endpoint {
    host: String,
    port: u16,
    tls: Option<bool>,
}

#[test]
fn round_trip_is_idempotent() {
    let endpoint = Endpoint {
        host: "db.internal".into(),
        port: 5432,
        tls: Some(true),
    };

    let first = to_representation_with(&endpoint, &Strict).unwrap();
    let back: Endpoint = from_representation_with(&first, &Strict).unwrap();
    let second = to_representation_with(&back, &Strict).unwrap();

    assert_eq!(back, endpoint);
    assert_eq!(first, second);
    let keys: Vec<&str> = first.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["host", "port", "tls"]);
}

#[test]
fn absent_optional_is_none() {
    let value = map([("host", "a".into()), ("port", Value::Int(1))]);
    let endpoint: Endpoint = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(endpoint.tls, None);
}

#[test]
fn missing_field_names_class_and_path() {
    let value = map([("host", "a".into())]);
    let err = from_representation_with::<Endpoint>(&value, &Strict).unwrap_err();
    match err.kind() {
        ErrorKind::MissingField { class, field } => {
            assert!(class.ends_with("Endpoint"));
            assert_eq!(*field, "port");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.path().to_string(), "port");
}

#[test]
fn strict_rejects_what_coerce_parses() {
    let value = map([
        ("host", "a".into()),
        ("port", "42".into()),
        ("tls", "true".into()),
    ]);

    let err = from_representation_with::<Endpoint>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
    assert_eq!(err.path().segments(), [field("port")]);

    let endpoint: Endpoint = from_representation_with(&value, &Coerce).unwrap();
    assert_eq!(endpoint.port, 42);
    assert_eq!(endpoint.tls, Some(true));
}

#[test]
fn out_of_range_is_rejected_under_both_policies() {
    let value = map([("host", "a".into()), ("port", Value::Int(70_000))]);
    assert!(from_representation_with::<Endpoint>(&value, &Strict).is_err());
    assert!(from_representation_with::<Endpoint>(&value, &Coerce).is_err());
}

// -----------------------------------------------------------------------------
// Names

#[derive(Reflect, Debug, PartialEq)]
#[reflect(rename_all = "camelCase")]
struct Limits {
    max_connections: u32,
    #[reflect(rename = "idle", alias = "idle_timeout", alias = "idleSecs")]
    idle_timeout_secs: u64,
    r#type: String,
}

#[test]
fn renames_apply_on_output() {
    let limits = Limits {
        max_connections: 8,
        idle_timeout_secs: 30,
        r#type: "pool".into(),
    };
    let value = to_representation_with(&limits, &Strict).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["maxConnections", "idle", "type"]);
}

#[test]
fn aliases_are_accepted_on_input() {
    for key in ["idle", "idle_timeout", "idleSecs"] {
        let value = map([
            ("maxConnections", Value::Int(1)),
            (key, Value::Int(5)),
            ("type", "x".into()),
        ]);
        let limits: Limits = from_representation_with(&value, &Strict).unwrap();
        assert_eq!(limits.idle_timeout_secs, 5);
    }

    // the Rust name is not an implicit alias
    let value = map([
        ("max_connections", Value::Int(1)),
        ("idle", Value::Int(5)),
        ("type", "x".into()),
    ]);
    let err = from_representation_with::<Limits>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MissingField { field: "maxConnections", .. }));
}

// -----------------------------------------------------------------------------
// Unknown fields

#[derive(Reflect, Debug, PartialEq)]
struct Loose {
    name: String,
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(deny_unknown_fields)]
struct Tight {
    name: String,
}

#[test]
fn unknown_fields_are_ignored_by_default() {
    let value = map([("name", "n".into()), ("extra", Value::Int(1))]);
    let loose: Loose = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(loose.name, "n");
}

#[test]
fn unknown_fields_denied_per_call() {
    let value = map([("name", "n".into()), ("extra", Value::Int(1))]);
    let err = Deserializer::new(&Strict)
        .deny_unknown_fields(true)
        .deserialize::<Loose>(&value)
        .unwrap_err();
    match err.kind() {
        ErrorKind::UnknownField { field, .. } => assert_eq!(field, "extra"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_fields_denied_per_class() {
    let value = map([("name", "n".into()), ("extra", Value::Int(1))]);
    let err = from_representation_with::<Tight>(&value, &Coerce).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownField { .. }));
}

// -----------------------------------------------------------------------------
// Defaults and skipping

fn default_retries() -> u8 {
    3
}

fn is_empty(tags: &Vec<String>) -> bool {
    tags.is_empty()
}

#[derive(Reflect, Debug, PartialEq)]
struct Job {
    name: String,
    #[reflect(default = default_retries)]
    retries: u8,
    #[reflect(default)]
    verbose: bool,
    #[reflect(skip)]
    runs: u32,
    #[reflect(skip_if_default)]
    priority: i32,
    #[reflect(skip_if = is_empty, default)]
    tags: Vec<String>,
}

#[test]
fn defaults_fill_absent_fields() {
    let value = map([("name", "build".into())]);
    let job: Job = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(
        job,
        Job {
            name: "build".into(),
            retries: 3,
            verbose: false,
            runs: 0,
            priority: 0,
            tags: Vec::new(),
        }
    );
}

#[test]
fn skipped_fields_are_not_emitted() {
    let job = Job {
        name: "build".into(),
        retries: 1,
        verbose: true,
        runs: 99,
        priority: 0,
        tags: Vec::new(),
    };
    let value = to_representation_with(&job, &Strict).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["name", "retries", "verbose"]);

    let job = Job {
        priority: 2,
        tags: vec!["ci".into()],
        ..job
    };
    let value = to_representation_with(&job, &Strict).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["name", "retries", "verbose", "priority", "tags"]);
}

#[test]
fn skipped_fields_ignore_input() {
    let value = map([("name", "n".into()), ("runs", Value::Int(7))]);
    let job: Job = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(job.runs, 0);
}

// -----------------------------------------------------------------------------
// Bases

#[derive(Reflect, Debug, PartialEq)]
struct Named {
    name: String,
    #[reflect(default)]
    label: String,
}

#[derive(Reflect, Debug, PartialEq)]
struct Service {
    #[reflect(base)]
    named: Named,
    replicas: u8,
    #[reflect(rename = "label")]
    display: String,
}

#[test]
fn base_fields_come_first_and_can_be_overridden() {
    let service = Service {
        named: Named {
            name: "api".into(),
            label: "hidden".into(),
        },
        replicas: 2,
        display: "API".into(),
    };
    let value = to_representation_with(&service, &Strict).unwrap();
    let map = value.as_map().unwrap();
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, ["name", "label", "replicas"]);
    assert_eq!(map.get("label"), Some(&Value::from("API")));
}

#[test]
fn base_reads_from_the_same_mapping() {
    let value = map([
        ("name", "api".into()),
        ("label", "API".into()),
        ("replicas", Value::Int(2)),
    ]);
    let service: Service = Deserializer::new(&Strict)
        .deny_unknown_fields(true)
        .deserialize(&value)
        .unwrap();
    assert_eq!(service.named.name, "api");
    // the overridden base field is not read
    assert_eq!(service.named.label, "");
    assert_eq!(service.display, "API");
    assert_eq!(service.replicas, 2);
}

#[derive(Reflect, Debug, PartialEq)]
struct Versioned {
    name: String,
    #[reflect(default)]
    version: u32,
}

#[derive(Reflect, Debug, PartialEq)]
struct Release {
    #[reflect(base)]
    base: Versioned,
    version: String,
}

#[test]
fn overrides_may_change_the_type() {
    let release = Release {
        base: Versioned {
            name: "conform".into(),
            version: 0,
        },
        version: "1.2.0".into(),
    };
    let value = to_representation_with(&release, &Strict).unwrap();
    assert_eq!(
        value,
        map([("name", "conform".into()), ("version", "1.2.0".into())])
    );
    let back: Release = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(back, release);
}

#[derive(Reflect, Debug, PartialEq)]
struct Tagged {
    #[reflect(base)]
    named: Option<Named>,
    tag: String,
}

#[derive(Reflect, Debug, PartialEq)]
struct Counter {
    count: u32,
}

#[derive(Reflect, Debug, PartialEq)]
struct Gauge {
    #[reflect(base)]
    counter: Counter,
    count: f64,
}

#[test]
fn invalid_bases_fail_both_ways() {
    let tagged = Tagged {
        named: None,
        tag: "t".into(),
    };
    let err = to_representation_with(&tagged, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidClass { .. }));
    let value = map([("tag", "t".into())]);
    let err = from_representation_with::<Tagged>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidClass { .. }));

    // `count` would never be read back into the base
    let gauge = Gauge {
        counter: Counter { count: 1 },
        count: 0.5,
    };
    let err = to_representation_with(&gauge, &Strict).unwrap_err();
    match err.kind() {
        ErrorKind::InvalidClass { class, reason } => {
            assert!(class.ends_with("Gauge"));
            assert!(reason.contains("count"));
        }
        other => panic!("unexpected error: {other}"),
    }
    let value = map([("count", Value::Float(0.5))]);
    let err = from_representation_with::<Gauge>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidClass { .. }));
}

// -----------------------------------------------------------------------------
// Hooks

mod hex {
    use conform_reflect::value::Value;
    use conform_reflect::{Error, Result};

    pub fn serialize(value: &u32) -> Result<Value> {
        Ok(Value::from(format!("{value:#x}")))
    }

    pub fn deserialize(value: &Value) -> Result<u32> {
        let text = value.as_str().ok_or_else(|| Error::custom("expected a hex string"))?;
        let digits = text.strip_prefix("0x").unwrap_or(text);
        u32::from_str_radix(digits, 16).map_err(Error::custom)
    }
}

#[derive(Reflect, Debug, PartialEq)]
struct Color {
    name: String,
    #[reflect(serialize_with = hex::serialize, deserialize_with = hex::deserialize)]
    rgb: u32,
}

#[derive(Reflect, Debug, PartialEq)]
struct Palette {
    colors: Vec<Color>,
}

#[test]
fn hooks_replace_field_conversion() {
    let color = Color {
        name: "teal".into(),
        rgb: 0x008080,
    };
    let value = to_representation_with(&color, &Strict).unwrap();
    assert_eq!(value.as_map().unwrap().get("rgb"), Some(&Value::from("0x8080")));

    let back: Color = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(back, color);
}

#[test]
fn hook_errors_carry_the_field_path() {
    let value = map([(
        "colors",
        Value::Seq(vec![
            map([("name", "ok".into()), ("rgb", "ff".into())]),
            map([("name", "bad".into()), ("rgb", "zz".into())]),
        ]),
    )]);
    let err = from_representation_with::<Palette>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Custom(_)));
    assert_eq!(err.path().to_string(), "colors[1].rgb");
}

// -----------------------------------------------------------------------------
// Tuple, newtype and unit structs

#[derive(Reflect, Debug, PartialEq)]
struct Port(u16);

#[derive(Reflect, Debug, PartialEq)]
struct Pair(String, i64);

#[derive(Reflect, Debug, PartialEq)]
struct Marker;

#[derive(Reflect, Debug, PartialEq)]
struct Listener {
    port: Port,
    pair: Pair,
    marker: Marker,
}

#[test]
fn struct_shapes() {
    let listener = Listener {
        port: Port(80),
        pair: Pair("a".into(), -1),
        marker: Marker,
    };
    let value = to_representation_with(&listener, &Strict).unwrap();
    assert_eq!(
        value,
        map([
            ("port", Value::Int(80)),
            ("pair", Value::Seq(vec!["a".into(), Value::Int(-1)])),
            ("marker", Value::Null),
        ])
    );

    let back: Listener = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(back, listener);
}

#[test]
fn tuple_length_is_checked() {
    let value = Value::Seq(vec!["a".into()]);
    let err = from_representation_with::<Pair>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
}

// -----------------------------------------------------------------------------
// Generics

#[derive(Reflect, Debug, PartialEq)]
struct Page<T> {
    items: Vec<T>,
    next: Option<u32>,
}

#[test]
fn generic_instantiations_have_their_own_descriptor() {
    use conform_reflect::info::Typed;

    let numbers = <Page<u32>>::type_info();
    let words = <Page<String>>::type_info();
    assert!(!core::ptr::eq(numbers, words));
    assert!(core::ptr::eq(numbers, <Page<u32>>::type_info()));

    let value = map([("items", Value::Seq(vec!["1".into(), "2".into()]))]);
    assert!(from_representation_with::<Page<u32>>(&value, &Strict).is_err());
    let page: Page<String> = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(page.items, ["1", "2"]);
    let page: Page<u32> = from_representation_with(&value, &Coerce).unwrap();
    assert_eq!(page.items, [1, 2]);
}
