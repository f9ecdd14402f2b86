//! Validator facade tests

use std::sync::{Arc, Barrier};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{ConfigValidationError, ValidatorConfig};
use crate::error::{ConfigError, ValidationError};
use crate::rule::{Rule, Verdict};
use crate::traits::{FieldDescriptor, Shape, Validate};
use crate::validator::Validator;

#[derive(Debug, Deserialize, PartialEq)]
struct Account {
    name: String,
    age: u32,
}

impl Validate for Account {
    fn shape() -> Shape {
        Shape::Record(vec![
            FieldDescriptor::new("name", "name", String::target()).with_rules("required|string|lenMin:2"),
            FieldDescriptor::new("age", "age", u32::target()).with_rules("int|min:0"),
        ])
    }
}

struct Tagged;

impl Validate for Tagged {
    fn shape() -> Shape {
        Shape::Record(vec![
            FieldDescriptor::new("Data", "Data", Value::target()).with_rules("C:1,2")
        ])
    }
}

struct Misconfigured;

impl Validate for Misconfigured {
    fn shape() -> Shape {
        Shape::Record(vec![
            FieldDescriptor::new("Data", "Data", Value::target()).with_rules("required|noSuchRule")
        ])
    }
}

#[test]
fn test_validate_decodes_valid_payload() {
    let validator = Validator::new();
    let account: Account = validator.validate(br#"{"name": "Ada", "age": 36}"#).unwrap();
    assert_eq!(
        account,
        Account {
            name: "Ada".to_string(),
            age: 36
        }
    );
}

#[test]
fn test_rule_failures_take_priority_over_decode() {
    let validator = Validator::new();
    let err = validator.validate::<Account>(br#"{"name": "A"}"#).unwrap_err();

    assert!(!err.is_fault());
    let bag = err.error_bag().unwrap();
    assert!(bag.has_failed("name", "lenMin"));
    assert_eq!(bag.count_errors(), 1);
}

#[test]
fn test_decode_fallback_when_rules_pass() {
    let validator = Validator::new();
    let err = validator.validate::<Account>(br#"{"name": "Ada"}"#).unwrap_err();

    assert!(matches!(err, ValidationError::Decode(_)));
    assert!(err.error_bag().is_none());
    assert!(validator.check::<Account>(br#"{"name": "Ada"}"#).is_ok());
}

#[test]
fn test_malformed_json_short_circuits() {
    let validator = Validator::new();

    let err = validator.check::<Account>(b"{\"name\": ").unwrap_err();
    assert!(matches!(err, ValidationError::MalformedJson(_)));

    let err = validator.check::<Account>(b"[1, 2]").unwrap_err();
    assert!(matches!(err, ValidationError::MalformedJson(_)));
    assert!(validator.cache().is_empty());
}

#[test]
fn test_payload_too_large() {
    let validator = Validator::new()
        .with_config(ValidatorConfig::new().with_max_input_size(8))
        .unwrap();
    let err = validator.check::<Account>(br#"{"name": "Ada Lovelace"}"#).unwrap_err();
    assert!(matches!(err, ValidationError::PayloadTooLarge { limit: 8, .. }));
}

#[test]
fn test_zero_size_limit_is_rejected() {
    let err = Validator::new()
        .with_config(ValidatorConfig::new().with_max_input_size(0))
        .unwrap_err();
    assert_eq!(err, ConfigValidationError::InvalidMaxInputSize);

    // Smallest limit that still admits an empty object.
    let validator = Validator::new()
        .with_config(ValidatorConfig::new().with_max_input_size(2))
        .unwrap();
    assert_eq!(validator.config().max_input_size, 2);
    assert!(validator.check::<Account>(b"{}").is_err_and(|err| err.error_bag().is_some()));
}

#[test]
fn test_unknown_rule_is_fault() {
    let validator = Validator::new();
    let err = validator.check::<Misconfigured>(br#"{"Data": 1}"#).unwrap_err();

    assert!(err.is_fault());
    assert!(matches!(
        err,
        ValidationError::Config(ConfigError::UnknownRule(ref name)) if name == "noSuchRule"
    ));
    assert!(validator.cache().is_empty());
}

#[test]
fn test_composite_failure_reports_inner_rule() {
    let mut validator = Validator::new();
    validator.register_composite("C", "required|minLen:$0|maxLen:$1");

    let bag = validator.check_value::<Tagged>(&json!({"Data": []})).unwrap();
    assert!(bag.has_failed("Data", "minLen"));
    assert_eq!(bag.count_errors(), 1);

    let bag = validator.check_value::<Tagged>(&json!({})).unwrap();
    assert!(bag.has_failed("Data", "required"));
    assert_eq!(bag.count_errors(), 1);
}

#[test]
fn test_registration_invalidates_cached_schemas() {
    let mut validator = Validator::new();
    assert!(validator.analyze::<Misconfigured>().is_err());

    validator.register_rule(Rule::new("noSuchRule", |ctx| {
        let ok = ctx.value().is_some_and(Value::is_string);
        Ok(Verdict::check(ok, || "Must be text".to_string()))
    }));

    let bag = validator.check_value::<Misconfigured>(&json!({"Data": 1})).unwrap();
    assert_eq!(bag.errors_for("Data"), ["[noSuchRule]: Must be text".to_string()]);

    validator.analyze::<Account>().unwrap();
    assert_eq!(validator.cache().len(), 2);
    validator.register_alias("text", "noSuchRule");
    assert!(validator.cache().is_empty());
}

#[test]
fn test_check_value_treats_non_object_root_as_empty() {
    let validator = Validator::new();
    let bag = validator.check_value::<Account>(&json!("scalar")).unwrap();
    assert!(bag.has_failed("name", "required"));
    assert_eq!(bag.count_errors(), 1);
}

#[test]
fn test_concurrent_first_use_builds_once() {
    const THREADS: usize = 8;

    let validator = Validator::new();
    let barrier = Barrier::new(THREADS);

    let graphs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    validator.analyze::<Account>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(validator.cache().build_count(), 1);
    assert!(graphs.iter().all(|graph| Arc::ptr_eq(graph, &graphs[0])));
}
