use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::Arc;

use prop_inject::{
    inject, inject_with_report, injectable, injectable_enum, Config, FieldError, InjectError,
    Outcome, Registry, Value,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Counter {
    count: i32,
}
injectable!(Counter { count => "cnt" });

#[derive(Debug, Default, PartialEq)]
struct Plain {
    untouched: String,
}
injectable!(Plain {});

injectable_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Mode {
        #[default]
        Standby,
        Active,
    }
}

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Default)]
struct Service {
    name: String,
    port: i32,
    timeout_ms: i64,
    verbose: bool,
    mode: Mode,
    greeter: Option<Arc<dyn Greeter>>,
    host: Option<String>,
}
injectable!(Service {
    name => "service.name",
    port => "service.port",
    timeout_ms => "service.timeout",
    verbose => "service.verbose",
    mode => "service.mode",
    greeter => "service.greeter",
    host => "service.${env}.host",
});

#[derive(Default)]
struct Parent {
    x: i32,
    y: i32,
}
injectable!(Parent { x => "x", y => "py" });

#[derive(Default)]
struct Child {
    parent: Parent,
    x: i32,
    y: i32,
}
injectable!(Child { x => "x", y => "cy" } extends parent: Parent);

struct Gauge {
    ratio: f64,
}
injectable!(Gauge { ratio => "ratio" });

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_type_without_fields_is_noop() {
    let mut plain = Plain {
        untouched: "keep".into(),
    };
    inject(&mut plain, &params(&[("untouched", "changed")])).unwrap();
    assert_eq!(plain.untouched, "keep");
}

#[test]
fn test_counter_example() {
    let mut counter = Counter::default();
    inject(&mut counter, &params(&[("cnt", "42")])).unwrap();
    assert_eq!(counter.count, 42);

    inject(&mut counter, &params(&[("cnt", "notanumber")])).unwrap();
    assert_eq!(counter.count, 42);

    inject(&mut counter, &params(&[("other", "7")])).unwrap();
    assert_eq!(counter.count, 42);
}

#[test]
fn test_injection_is_idempotent() {
    let parameters = params(&[("cnt", "9")]);
    let mut counter = Counter::default();
    inject(&mut counter, &parameters).unwrap();
    let first = counter.clone();
    inject(&mut counter, &parameters).unwrap();
    assert_eq!(counter, first);
}

#[test]
fn test_all_supported_kinds() {
    let greeter: Arc<dyn Greeter> = Arc::new(English);
    let parameters: BTreeMap<&str, Value> = BTreeMap::from([
        ("service.name", Value::from("edge")),
        ("service.port", Value::from("8080")),
        ("service.timeout", Value::Integer(30_000)),
        ("service.verbose", Value::from("true")),
        ("service.mode", Value::from("Active")),
        ("service.greeter", Value::object(greeter)),
        ("env", Value::from("prod")),
        ("service.prod.host", Value::from("prod.example.com")),
    ]);

    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();

    assert_eq!(service.name, "edge");
    assert_eq!(service.port, 8080);
    assert_eq!(service.timeout_ms, 30_000);
    assert!(service.verbose);
    assert_eq!(service.mode, Mode::Active);
    assert_eq!(service.greeter.map(|g| g.greet()).as_deref(), Some("hello"));
    assert_eq!(service.host.as_deref(), Some("prod.example.com"));
}

#[test]
fn test_enum_value_passes_through() {
    let parameters = HashMap::from([("service.mode", Value::object(Mode::Active))]);
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();
    assert_eq!(service.mode, Mode::Active);
}

#[test]
fn test_enum_from_string_object() {
    let parameters = HashMap::from([("service.mode", Value::object("Active".to_string()))]);
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();
    assert_eq!(service.mode, Mode::Active);
}

#[test]
fn test_float_parameters_keep_their_fraction() {
    let parameters = HashMap::from([
        ("service.name", Value::Float(1.0)),
        ("env", Value::Float(2.0)),
        ("service.2.0.host", Value::from("v2.example.com")),
    ]);
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();
    assert_eq!(service.name, "1.0");
    assert_eq!(service.host.as_deref(), Some("v2.example.com"));
}

#[test]
fn test_unknown_enum_name_is_reported_not_raised() {
    let parameters = HashMap::from([
        ("service.mode", Value::from("Sleeping")),
        ("service.port", Value::from("81")),
    ]);
    let mut service = Service::default();
    let report = inject_with_report(&mut service, &parameters).unwrap();

    let failed: Vec<_> = report
        .iter()
        .filter_map(|outcome| match outcome {
            Outcome::Failed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        failed,
        [FieldError::UnknownVariant {
            enum_name: "Mode",
            value: "Sleeping".to_string(),
        }]
    );
    assert_eq!(service.mode, Mode::Standby);
    assert_eq!(service.port, 81);
}

#[test]
fn test_enum_from_unrelated_type_is_skipped() {
    let parameters = HashMap::from([("service.mode", Value::Integer(1))]);
    let mut service = Service::default();
    let report = inject_with_report(&mut service, &parameters).unwrap();
    assert!(report
        .iter()
        .any(|o| matches!(o, Outcome::Unconverted { field: "mode", .. })));
    assert_eq!(service.mode, Mode::Standby);
}

#[test]
fn test_interface_with_wrong_object_is_skipped() {
    let parameters = HashMap::from([("service.greeter", Value::from("not a greeter"))]);
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();
    assert!(service.greeter.is_none());
}

#[test]
fn test_unresolved_placeholder_uses_literal_key() {
    let parameters = params(&[("service.${env}.host", "fallback")]);
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();
    assert_eq!(service.host.as_deref(), Some("fallback"));
}

#[test]
fn test_shadowed_names_reach_both_levels() {
    let mut child = Child::default();
    inject(&mut child, &params(&[("x", "5"), ("cy", "1"), ("py", "2")])).unwrap();
    assert_eq!(child.x, 5);
    assert_eq!(child.parent.x, 5);
    assert_eq!(child.y, 1);
    assert_eq!(child.parent.y, 2);
}

#[test]
fn test_parent_applied_after_child() {
    let mut child = Child::default();
    let report = inject_with_report(&mut child, &params(&[("x", "5")])).unwrap();
    let keys: Vec<_> = report.iter().map(Outcome::key).collect();
    assert_eq!(keys, ["x", "cy", "x", "py"]);
}

#[test]
fn test_unsupported_field_type_fails_before_injection() {
    let mut gauge = Gauge { ratio: 1.5 };
    let err = inject(&mut gauge, &params(&[("ratio", "2.5")])).unwrap_err();
    assert!(matches!(
        err,
        InjectError::UnsupportedType {
            field: "ratio",
            type_name: "f64",
            ..
        }
    ));
    assert_eq!(gauge.ratio, 1.5);
    assert!(!Registry::global().contains::<Gauge>());
}

#[test]
fn test_toml_table_as_parameters() {
    let table: toml::Table = toml::from_str(
        r#"
        cnt = 12
        "#,
    )
    .unwrap();
    let mut counter = Counter::default();
    inject(&mut counter, &table).unwrap();
    assert_eq!(counter.count, 12);
}

#[test]
fn test_loaded_parameters_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        env = "staging"

        [service]
        name = "api"
        port = 9000
        mode = "Active"

        [service.staging]
        host = "staging.internal"
        "#
    )
    .unwrap();

    let parameters = Config::builder().with_file(file.path(), true).build().unwrap();
    let mut service = Service::default();
    inject(&mut service, &parameters).unwrap();

    assert_eq!(service.name, "api");
    assert_eq!(service.port, 9000);
    assert_eq!(service.mode, Mode::Active);
    assert_eq!(service.host.as_deref(), Some("staging.internal"));
}

#[test]
fn test_concurrent_injection() {
    std::thread::scope(|s| {
        for i in 0..8 {
            s.spawn(move || {
                let mut child = Child::default();
                let value = i.to_string();
                inject(&mut child, &params(&[("x", value.as_str())])).unwrap();
                assert_eq!(child.x, i);
                assert_eq!(child.parent.x, i);
            });
        }
    });
    assert!(Registry::global().contains::<Child>());
}
