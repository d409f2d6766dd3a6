//! Collaborator services feeding a validation pass and rendering its errors

use std::fs;
use std::path::Path;

use fieldgate::resources::{ConfigStore, Environment, LangCatalog};
use fieldgate::{Mode, ResourceError, Validator};
use serde_json::json;

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn rules_and_mode_from_environment_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("stg/signup.json"),
        r#"{"greedy": true, "rules": {"email": "email", "age": "opt_int"}}"#,
    );

    let mut config = ConfigStore::new(dir.path()).with_env("stg".parse().unwrap());
    assert_eq!(config.env(), Some(Environment::Stg));
    let signup = config.get("signup").unwrap().clone();

    let mode = if signup["greedy"] == json!(true) {
        Mode::Greedy
    } else {
        Mode::Frugal
    };
    let mut validator = Validator::new(mode);
    let rules = signup["rules"].as_object().unwrap();
    validator
        .add_rules(rules.iter().map(|(field, decl)| (field, decl.as_str().unwrap())))
        .unwrap();

    let mut data = json!({"email": "bad", "age": "x"});
    assert!(!validator.check(&mut data).unwrap());
    assert_eq!(validator.errors().len(), 2);
    assert!(config.is_cached("signup"));
}

#[test]
fn collector_messages_rendered_through_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("en.json"),
        r#"{"field_error": "The {field} field is invalid: {message}"}"#,
    );

    let mut validator = Validator::greedy();
    let mut data = json!({"email": "nope"});
    validator.validate(&mut data, [("email", "email")]).unwrap();

    let mut lang = LangCatalog::new(dir.path());
    let rendered: Vec<String> = validator
        .errors()
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| json!({"field": field, "message": message}))
        })
        .map(|data| lang.message("en", "field_error", &data).unwrap())
        .collect();

    assert_eq!(
        rendered,
        ["The email field is invalid: Is not a valid email"]
    );
}

#[test]
fn collaborator_failures_are_distinct_from_field_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut lang = LangCatalog::new(dir.path());

    let err = lang.message("de", "field_error", &json!({})).unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { .. }));
    assert!(err.to_string().contains("de.json"));
}
