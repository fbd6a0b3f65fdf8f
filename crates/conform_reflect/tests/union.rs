use conform_reflect::derive::Reflect;
use conform_reflect::policy::{Coerce, Strict};
use conform_reflect::value::{Mapping, Value};
use conform_reflect::{ErrorKind, from_representation_with, to_representation_with};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let mut map = Mapping::new();
    for (key, value) in entries {
        map.insert(key, value);
    }
    Value::Map(map)
}

// -----------------------------------------------------------------------------
// Internal tagging

#[derive(Reflect, Debug, PartialEq)]
enum Shape {
    Circle { r: f64 },
    #[reflect(rename = "rect", alias = "rectangle")]
    Rect { w: f64, h: f64 },
    Empty,
}

#[test]
fn internal_tag_is_the_first_key() {
    let value = to_representation_with(&Shape::Rect { w: 2.0, h: 1.0 }, &Strict).unwrap();
    assert_eq!(
        value,
        map([
            ("type", "rect".into()),
            ("w", Value::Float(2.0)),
            ("h", Value::Float(1.0)),
        ])
    );
    assert_eq!(value.as_map().unwrap().keys().next(), Some("type"));

    let empty = to_representation_with(&Shape::Empty, &Strict).unwrap();
    assert_eq!(empty, map([("type", "Empty".into())]));

    for shape in [Shape::Circle { r: 0.5 }, Shape::Rect { w: 2.0, h: 1.0 }, Shape::Empty] {
        let value = to_representation_with(&shape, &Strict).unwrap();
        let back: Shape = from_representation_with(&value, &Strict).unwrap();
        assert_eq!(back, shape);
    }
}

#[test]
fn variant_aliases_select_the_variant() {
    let value = map([
        ("type", "rectangle".into()),
        ("w", Value::Float(1.0)),
        ("h", Value::Float(1.0)),
    ]);
    let shape: Shape = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(shape, Shape::Rect { w: 1.0, h: 1.0 });
}

#[test]
fn tagged_variant_errors_point_into_the_payload() {
    let value = map([("type", "Circle".into()), ("r", "big".into())]);
    let err = from_representation_with::<Shape>(&value, &Coerce).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
    assert_eq!(err.path().to_string(), "r");
}

#[test]
fn missing_tag_falls_back_on_the_payload() {
    init_tracing();
    let value = map([("w", Value::Float(3.0)), ("h", Value::Float(4.0))]);
    let shape: Shape = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(shape, Shape::Rect { w: 3.0, h: 4.0 });

    // an unrecognized tag is dropped before the fallback
    let value = map([("type", "disc".into()), ("r", Value::Float(1.0))]);
    let shape: Shape = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(shape, Shape::Circle { r: 1.0 });
}

#[test]
fn no_matching_variant_is_rejected() {
    let value = map([("side", Value::Float(3.0))]);
    // `Empty` only accepts an empty payload
    let err = from_representation_with::<Shape>(&value, &Coerce).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RejectedValue { .. }));
}

// -----------------------------------------------------------------------------
// Fallback resolution

#[derive(Reflect, Debug, PartialEq)]
#[reflect(untagged)]
enum Number {
    Small(i32),
    Wide(i64),
    Real(f64),
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(untagged)]
enum Scalar {
    Flag(bool),
    Text(String),
    Real(f64),
}

#[test]
fn strict_requires_exactly_one_match() {
    init_tracing();
    let err = from_representation_with::<Number>(&Value::Int(1), &Strict).unwrap_err();
    match err.kind() {
        ErrorKind::AmbiguousUnion { candidates, .. } => {
            assert_eq!(candidates, &["Small", "Wide"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let number: Number = from_representation_with(&Value::Int(1 << 40), &Strict).unwrap();
    assert_eq!(number, Number::Wide(1 << 40));
    let number: Number = from_representation_with(&Value::Float(0.5), &Strict).unwrap();
    assert_eq!(number, Number::Real(0.5));
}

#[test]
fn coerce_takes_the_first_match() {
    let number: Number = from_representation_with(&Value::Int(1), &Coerce).unwrap();
    assert_eq!(number, Number::Small(1));

    // "true" parses as a bool before it is kept as text
    let scalar: Scalar = from_representation_with(&Value::from("true"), &Coerce).unwrap();
    assert_eq!(scalar, Scalar::Flag(true));
    let scalar: Scalar = from_representation_with(&Value::from("true"), &Strict).unwrap();
    assert_eq!(scalar, Scalar::Text("true".into()));
}

#[test]
fn untagged_writes_the_payload_only() {
    let value = to_representation_with(&Scalar::Text("x".into()), &Strict).unwrap();
    assert_eq!(value, Value::from("x"));
}

fn parse_hex(value: &Value) -> conform_reflect::Result<u32> {
    let text = value
        .as_str()
        .ok_or_else(|| conform_reflect::Error::custom("expected a hex string"))?;
    u32::from_str_radix(text, 16).map_err(conform_reflect::Error::custom)
}

#[derive(Reflect, Debug, PartialEq)]
struct Rgb {
    #[reflect(deserialize_with = parse_hex)]
    rgb: u32,
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(untagged)]
enum Paint {
    Hex(Rgb),
    Named(String),
}

#[test]
fn hook_errors_are_not_skipped_by_the_fallback() {
    let value = map([("rgb", "00ff00".into())]);
    let paint: Paint = from_representation_with(&value, &Coerce).unwrap();
    assert_eq!(paint, Paint::Hex(Rgb { rgb: 0x00ff00 }));

    let value = map([("rgb", "green".into())]);
    let err = from_representation_with::<Paint>(&value, &Coerce).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Custom(_)));
    assert_eq!(err.path().to_string(), "rgb");
}

// -----------------------------------------------------------------------------
// External and adjacent tagging

#[derive(Reflect, Debug, PartialEq)]
#[reflect(external, rename_all = "snake_case")]
enum Action {
    Stop,
    MoveTo(i32, i32),
    SetName(String),
    Resize { width: u32 },
}

#[derive(Reflect, Debug, PartialEq)]
#[reflect(tag = "op", content = "args")]
enum Command {
    Ping,
    Echo(String),
}

#[test]
fn external_tagging() {
    assert_eq!(to_representation_with(&Action::Stop, &Strict).unwrap(), Value::from("stop"));
    assert_eq!(
        to_representation_with(&Action::MoveTo(1, 2), &Strict).unwrap(),
        map([("move_to", Value::Seq(vec![Value::Int(1), Value::Int(2)]))])
    );
    assert_eq!(
        to_representation_with(&Action::Resize { width: 3 }, &Strict).unwrap(),
        map([("resize", map([("width", Value::Int(3))]))])
    );

    for action in [
        Action::Stop,
        Action::MoveTo(-1, 4),
        Action::SetName("n".into()),
        Action::Resize { width: 9 },
    ] {
        let value = to_representation_with(&action, &Strict).unwrap();
        let back: Action = from_representation_with(&value, &Strict).unwrap();
        assert_eq!(back, action);
    }
}

#[test]
fn adjacent_tagging() {
    assert_eq!(
        to_representation_with(&Command::Echo("hi".into()), &Strict).unwrap(),
        map([("op", "Echo".into()), ("args", "hi".into())])
    );
    assert_eq!(
        to_representation_with(&Command::Ping, &Strict).unwrap(),
        map([("op", "Ping".into())])
    );

    let value = map([("op", "Ping".into())]);
    let command: Command = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(command, Command::Ping);

    // unknown tag: the content is tried against every variant
    let value = map([("op", "Say".into()), ("args", "hi".into())]);
    let command: Command = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(command, Command::Echo("hi".into()));
}

// -----------------------------------------------------------------------------
// Unions inside classes

#[derive(Reflect, Debug, PartialEq)]
struct Canvas {
    shapes: Vec<Shape>,
    background: Option<Scalar>,
}

#[test]
fn union_errors_carry_the_element_path() {
    let value = map([(
        "shapes",
        Value::Seq(vec![
            map([("type", "Circle".into()), ("r", Value::Float(1.0))]),
            map([("type", "rect".into()), ("w", Value::Float(1.0))]),
        ]),
    )]);
    let err = from_representation_with::<Canvas>(&value, &Strict).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MissingField { field: "h", .. }));
    assert_eq!(err.path().to_string(), "shapes[1].h");
}

#[test]
fn optional_union_round_trip() {
    let canvas = Canvas {
        shapes: vec![Shape::Empty],
        background: Some(Scalar::Real(0.25)),
    };
    let value = to_representation_with(&canvas, &Strict).unwrap();
    let back: Canvas = from_representation_with(&value, &Strict).unwrap();
    assert_eq!(back, canvas);
}
