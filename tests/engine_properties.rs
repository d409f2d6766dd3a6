//! Property-based tests for validation passes

use fieldgate::{Mode, Validator};
use proptest::prelude::*;
use serde_json::{Map, Value};

const TOKENS: &[&str] = &[
    "exists",
    "opt_exists",
    "int",
    "opt_int",
    "int[]",
    "opt_int[]",
    "bool",
    "float",
    "array",
    "string",
    "opt_string",
    "email",
    "optional",
];

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Greedy), Just(Mode::Frugal)]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9@. -]{0,12}".prop_map(Value::String),
        (-1000i32..1000).prop_map(|n| Value::String(n.to_string())),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::Array)
    })
}

fn arb_field() -> impl Strategy<Value = String> {
    "[a-e]".prop_map(String::from)
}

fn arb_record() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec((arb_field(), arb_value()), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn arb_declarations() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            arb_field(),
            prop::collection::vec(prop::sample::select(TOKENS), 1..4),
        ),
        1..5,
    )
    .prop_map(|decls| {
        decls
            .into_iter()
            .map(|(field, tokens)| (field, tokens.join("|")))
            .collect()
    })
}

/// Whether an absent field gets a default before its evaluation stops.
///
/// Every `opt_*` token fills an absent field and passes. `optional` skips
/// the rest, and every other token fails on an absent field, so only the
/// first rule decides.
fn defaults_when_absent(labels: &[&str]) -> bool {
    labels.first().is_some_and(|label| label.starts_with("opt_"))
}

proptest! {
    #[test]
    fn prop_result_matches_empty_collector(
        mode in arb_mode(),
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut validator = Validator::new(mode);
        let mut data = Value::Object(record);
        let passed = validator.validate(&mut data, decls).unwrap();

        prop_assert_eq!(passed, validator.is_valid());
        prop_assert_eq!(validator.is_valid(), validator.errors().is_empty());
    }

    #[test]
    fn prop_collected_fields_have_messages(
        mode in arb_mode(),
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut validator = Validator::new(mode);
        let mut data = Value::Object(record);
        validator.validate(&mut data, decls).unwrap();

        for (_, messages) in validator.errors().iter() {
            prop_assert!(!messages.is_empty());
        }
    }

    #[test]
    fn prop_projection_keeps_only_declared_fields(
        mode in arb_mode(),
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut validator = Validator::new(mode);
        let mut data = Value::Object(record);
        validator.validate(&mut data, decls.clone()).unwrap();

        let Value::Object(projected) = data else {
            panic!("record stays an object");
        };
        for key in projected.keys() {
            prop_assert!(decls.iter().any(|(field, _)| field == key));
        }
    }

    #[test]
    fn prop_greedy_projection_equals_declared_fields(
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut validator = Validator::greedy();
        let mut data = Value::Object(record.clone());
        validator.validate(&mut data, decls).unwrap();

        let Value::Object(projected) = data else {
            panic!("record stays an object");
        };
        for field in validator.field_names() {
            let expected = record.contains_key(field)
                || defaults_when_absent(&validator.rules().labels(field));
            prop_assert_eq!(projected.contains_key(field), expected, "field {}", field);
        }
        prop_assert!(projected.len() <= validator.rules().len());
    }

    #[test]
    fn prop_greedy_reports_superset_of_frugal(
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut greedy = Validator::greedy();
        let mut frugal = Validator::frugal();
        let mut greedy_data = Value::Object(record.clone());
        let mut frugal_data = Value::Object(record);

        greedy.validate(&mut greedy_data, decls.clone()).unwrap();
        frugal.validate(&mut frugal_data, decls).unwrap();

        prop_assert!(frugal.errors().len() <= 1);
        for field in frugal.errors().fields() {
            prop_assert_eq!(greedy.errors().get(field), frugal.errors().get(field));
        }
        prop_assert_eq!(greedy.is_valid(), frugal.is_valid());
    }

    #[test]
    fn prop_identical_passing_input_gives_identical_output(
        record in arb_record(),
        decls in arb_declarations(),
    ) {
        let mut validator = Validator::greedy();
        let mut first = Value::Object(record.clone());

        if validator.validate(&mut first, decls.clone()).unwrap() {
            let mut second = Value::Object(record);
            prop_assert!(validator.validate(&mut second, decls).unwrap());
            prop_assert_eq!(second, first);
            prop_assert!(validator.errors().is_empty());
        }
    }
}
