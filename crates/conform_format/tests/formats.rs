use conform_format::{
    Format, FormatError, Json, JsonOptions, Ron, RonOptions, Toml, TomlOptions, from_json,
    from_json_with, from_ron, from_str_with, from_toml, from_toml_with, from_toml_with_options,
    to_json, to_ron, to_string_with, to_toml, to_toml_with_options,
};
use conform_reflect::ErrorKind;
use conform_reflect::derive::Reflect;
use conform_reflect::policy::{Coerce, Strict};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Reflect, Debug, PartialEq, Clone)]
#[reflect(tag = "kind", rename_all = "lowercase")]
enum Sink {
    Stdout,
    File { path: String, rotate: Option<u32> },
    Http { url: String, headers: Vec<String> },
}

#[derive(Reflect, Debug, PartialEq, Clone)]
struct Listen {
    host: String,
    port: u16,
}

#[derive(Reflect, Debug, PartialEq, Clone)]
#[reflect(rename_all = "kebab-case")]
struct Pipeline {
    name: String,
    listen: Listen,
    #[reflect(default)]
    batch_size: u32,
    sinks: Vec<Sink>,
    sample_rate: Option<f64>,
}

fn pipeline() -> Pipeline {
    Pipeline {
        name: "ingest".into(),
        listen: Listen {
            host: "0.0.0.0".into(),
            port: 4317,
        },
        batch_size: 512,
        sinks: vec![
            Sink::Stdout,
            Sink::File {
                path: "/var/log/ingest".into(),
                rotate: None,
            },
            Sink::Http {
                url: "https://collector".into(),
                headers: vec!["x-team: obs".into()],
            },
        ],
        sample_rate: None,
    }
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn toml_round_trip() {
    init_tracing();
    let pipeline = pipeline();
    let text = to_toml(&pipeline).unwrap();

    assert!(text.contains("[listen]"));
    assert!(text.contains("[[sinks]]"));
    assert!(text.contains("batch-size = 512"));
    // `None` has no TOML form and is left out
    assert!(!text.contains("sample-rate"));
    assert!(!text.contains("rotate"));

    assert_eq!(from_toml_with::<Pipeline>(&text, &Strict).unwrap(), pipeline);
}

#[test]
fn toml_options_reach_the_codec() {
    let pipeline = pipeline();
    let options = TomlOptions { inline_tables: true };
    let text = to_toml_with_options(&pipeline, &Strict, &options).unwrap();
    assert!(text.contains("listen = {"));
    assert!(!text.contains("[listen]"));
    assert!(!text.contains("[[sinks]]"));

    let back: Pipeline = from_toml_with_options(&text, &Strict, &options).unwrap();
    assert_eq!(back, pipeline);
}

#[test]
fn json_round_trip() {
    let pipeline = pipeline();
    let text = to_json(&pipeline).unwrap();
    assert!(text.contains(r#""sample-rate":null"#));
    assert!(text.contains(r#"{"kind":"stdout"}"#));
    assert_eq!(from_json_with::<Pipeline>(&text, &Strict).unwrap(), pipeline);
}

#[test]
fn ron_round_trip() {
    let pipeline = pipeline();
    let text = to_ron(&pipeline).unwrap();
    assert_eq!(from_ron::<Pipeline>(&text).unwrap(), pipeline);

    let pretty = to_string_with::<Ron, _>(&pipeline, &Strict, &RonOptions { pretty: true }).unwrap();
    assert!(pretty.lines().count() > 1);
    let back: Pipeline = from_str_with::<Ron, _>(&pretty, &Strict, &RonOptions::default()).unwrap();
    assert_eq!(back, pipeline);
}

#[test]
fn formats_agree_on_the_value_tree() {
    let pipeline = pipeline();
    let json = Json::decode(&to_json(&pipeline).unwrap(), &JsonOptions::default()).unwrap();
    let ron = Ron::decode(&to_ron(&pipeline).unwrap(), &RonOptions::default()).unwrap();
    assert_eq!(json, ron);

    let options = TomlOptions { inline_tables: true };
    let toml = to_string_with::<Toml, _>(&pipeline, &Coerce, &options).unwrap();
    assert!(!toml.contains("[listen]"));
    let back: Pipeline = from_str_with::<Toml, _>(&toml, &Strict, &options).unwrap();
    assert_eq!(back, pipeline);
}

// -----------------------------------------------------------------------------
// Policies and errors

const LOOSE_JSON: &str = r#"{
    "name": "ingest",
    "listen": {"host": "localhost", "port": "4317"},
    "sinks": [{"kind": "stdout"}]
}"#;

#[test]
fn coerce_accepts_what_strict_rejects() {
    let pipeline: Pipeline = from_json(LOOSE_JSON).unwrap();
    assert_eq!(pipeline.listen.port, 4317);
    assert_eq!(pipeline.batch_size, 0);
    assert_eq!(pipeline.sample_rate, None);

    let err = from_json_with::<Pipeline>(LOOSE_JSON, &Strict).unwrap_err();
    let core = err.as_core().unwrap();
    assert!(matches!(core.kind(), ErrorKind::RejectedValue { .. }));
    assert_eq!(core.path().to_string(), "listen.port");
}

#[test]
fn core_errors_pass_through_unchanged() {
    let text = "name = \"x\"\n[listen]\nhost = \"h\"\nport = 1\n\n[[sinks]]\nkind = \"file\"\n";
    let err = from_toml::<Pipeline>(text).unwrap_err();
    match err {
        FormatError::Core(core) => {
            assert!(matches!(core.kind(), ErrorKind::MissingField { field: "path", .. }));
            assert_eq!(core.path().to_string(), "sinks[0].path");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn codec_errors_keep_their_source() {
    use core::error::Error as _;

    let err = from_json::<Pipeline>("{\"name\": ").unwrap_err();
    assert!(matches!(err, FormatError::Codec { format: "json", .. }));
    assert!(err.source().is_some());

    let err = from_toml::<Pipeline>("name = = 1").unwrap_err();
    assert!(matches!(err, FormatError::Codec { format: "toml", .. }));
}

#[test]
fn integers_beyond_i64_are_rejected() {
    let err = from_json::<Listen>(r#"{"host": "h", "port": 18446744073709551615}"#).unwrap_err();
    assert!(matches!(err, FormatError::Codec { .. }));
}
