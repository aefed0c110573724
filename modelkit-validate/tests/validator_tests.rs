use modelkit_model::{FieldDefinition, FieldOption, FieldType, FieldValidation};
use modelkit_validate::{ValidationErrorKind, generate_validator};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use ValidationErrorKind::*;

fn field(name: &str, field_type: FieldType) -> FieldDefinition {
    FieldDefinition::new(name, name.to_uppercase(), field_type)
}

fn kinds_for(fields: &[FieldDefinition], data: Value) -> Vec<ValidationErrorKind> {
    match generate_validator(fields).validate_value(&data) {
        Ok(()) => vec![],
        Err(report) => report.kinds(),
    }
}

fn record(name: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), value);
    Value::Object(map)
}

fn passes(f: FieldDefinition, value: Value) -> bool {
    let data = record(&f.name, value);
    kinds_for(&[f], data).is_empty()
}

fn fails_with(f: FieldDefinition, value: Value) -> Vec<ValidationErrorKind> {
    let data = record(&f.name, value);
    kinds_for(&[f], data)
}

// ── Example scenarios ────────────────────────────────────────────

#[test]
fn required_title_missing() {
    let fields = vec![field("title", FieldType::Text).required(true)];
    let report = generate_validator(&fields)
        .validate_value(&json!({}))
        .unwrap_err();
    assert_eq!(report.len(), 1);
    let issue = report.issue_for("title").unwrap();
    assert_eq!(issue.kind, RequiredFieldMissing);
    assert_eq!(issue.message, "TITLE is required");
}

#[test]
fn required_email() {
    let fields = vec![field("email", FieldType::Email).required(true)];
    assert_eq!(
        kinds_for(&fields, json!({"email": "not-an-email"})),
        vec![TypeMismatch]
    );
    assert_eq!(kinds_for(&fields, json!({"email": "a@b.com"})), vec![]);
}

#[test]
fn email_shapes() {
    for ok in ["a@b.co", "first.last@mail.example.org", "x+tag@sub.d.io"] {
        assert!(passes(field("e", FieldType::Email), json!(ok)), "{ok} rejected");
    }
    for bad in ["a@b", "@b.co", "a@.co", "a@b.", "a b@c.de", "a@b@c.de", "a@"] {
        assert_eq!(
            fails_with(field("e", FieldType::Email), json!(bad)),
            vec![TypeMismatch],
            "{bad}"
        );
    }
}

#[test]
fn multiselect_tags() {
    let fields = vec![
        field("tags", FieldType::Multiselect).with_options(vec![FieldOption::new("a", "A")]),
    ];
    assert_eq!(kinds_for(&fields, json!({"tags": ["a"]})), vec![]);
    assert_eq!(kinds_for(&fields, json!({"tags": "a"})), vec![TypeMismatch]);
}

#[test]
fn rating_bounds() {
    let fields = vec![field("rating", FieldType::Rating)];
    assert_eq!(kinds_for(&fields, json!({"rating": 6})), vec![OutOfRange]);
    assert_eq!(kinds_for(&fields, json!({"rating": 5})), vec![]);
    assert_eq!(kinds_for(&fields, json!({"rating": 0})), vec![]);
    assert_eq!(kinds_for(&fields, json!({"rating": -0.5})), vec![OutOfRange]);
}

// ── Presence ─────────────────────────────────────────────────────

#[test]
fn null_and_empty_string_count_as_absent() {
    let fields = vec![field("n", FieldType::Number).required(true)];
    assert_eq!(kinds_for(&fields, json!({"n": null})), vec![RequiredFieldMissing]);
    assert_eq!(kinds_for(&fields, json!({"n": ""})), vec![RequiredFieldMissing]);
}

#[test]
fn optional_absent_skips_type_check() {
    let fields = vec![field("when", FieldType::Color)];
    assert_eq!(kinds_for(&fields, json!({"when": ""})), vec![]);
    assert_eq!(kinds_for(&fields, json!({})), vec![]);
}

#[test]
fn required_checked_before_type() {
    let fields = vec![field("b", FieldType::Boolean).required(true)];
    assert_eq!(kinds_for(&fields, json!({"b": ""})), vec![RequiredFieldMissing]);
    assert_eq!(kinds_for(&fields, json!({"b": "yes"})), vec![TypeMismatch]);
}

#[test]
fn false_and_zero_are_present() {
    let fields = vec![
        field("b", FieldType::Boolean).required(true),
        field("n", FieldType::Number).required(true),
    ];
    assert_eq!(kinds_for(&fields, json!({"b": false, "n": 0})), vec![]);
}

// ── Per-type rules ───────────────────────────────────────────────

#[test]
fn text_accepts_strings_only() {
    assert!(passes(field("t", FieldType::Text), json!("anything")));
    assert_eq!(fails_with(field("t", FieldType::Text), json!(12)), vec![TypeMismatch]);
}

#[test]
fn url_must_be_absolute() {
    assert!(passes(field("u", FieldType::Url), json!("https://example.com/a?b=c")));
    assert_eq!(
        fails_with(field("u", FieldType::Url), json!("/relative/path")),
        vec![TypeMismatch]
    );
    assert_eq!(
        fails_with(field("u", FieldType::Url), json!("example.com")),
        vec![TypeMismatch]
    );
}

#[test]
fn number_accepts_numeric_strings() {
    assert!(passes(field("n", FieldType::Number), json!(3.5)));
    assert!(passes(field("n", FieldType::Number), json!(" 42 ")));
    assert_eq!(fails_with(field("n", FieldType::Number), json!("4x")), vec![TypeMismatch]);
    assert_eq!(fails_with(field("n", FieldType::Number), json!("NaN")), vec![TypeMismatch]);
    assert_eq!(fails_with(field("n", FieldType::Number), json!(true)), vec![TypeMismatch]);
}

#[test]
fn boolean_accepts_booleans_only() {
    assert!(passes(field("b", FieldType::Boolean), json!(true)));
    assert_eq!(fails_with(field("b", FieldType::Boolean), json!("true")), vec![TypeMismatch]);
    assert_eq!(fails_with(field("b", FieldType::Boolean), json!(1)), vec![TypeMismatch]);
}

#[test]
fn date_and_time_accept_any_string() {
    for ft in [FieldType::Date, FieldType::Datetime, FieldType::Time] {
        assert!(passes(field("d", ft.clone()), json!("whenever")));
        assert_eq!(fails_with(field("d", ft), json!(20240101)), vec![TypeMismatch]);
    }
}

#[test]
fn file_like_accept_references() {
    for ft in [FieldType::File, FieldType::Image, FieldType::Gallery] {
        assert!(passes(field("f", ft.clone()), json!("https://cdn.example.com/a.png")));
        assert!(passes(field("f", ft.clone()), json!({"id": 4, "url": "x"})));
        assert_eq!(fails_with(field("f", ft), json!(true)), vec![TypeMismatch]);
    }
}

#[test]
fn gallery_accepts_lists_of_references() {
    assert!(passes(field("g", FieldType::Gallery), json!(["a.png", {"id": 2}])));
    assert_eq!(
        fails_with(field("g", FieldType::Gallery), json!(["a.png", 3])),
        vec![TypeMismatch]
    );
    assert_eq!(fails_with(field("g", FieldType::Image), json!(["a.png"])), vec![TypeMismatch]);
}

#[test]
fn checkbox_requires_string_items() {
    assert!(passes(field("c", FieldType::Checkbox), json!([])));
    assert_eq!(
        fails_with(field("c", FieldType::Checkbox), json!(["a", 1])),
        vec![TypeMismatch]
    );
}

#[test]
fn json_field_must_parse() {
    assert!(passes(field("j", FieldType::Json), json!("{\"a\": [1, 2]}")));
    assert!(passes(field("j", FieldType::Json), json!("42")));
    assert_eq!(fails_with(field("j", FieldType::Json), json!("{broken")), vec![InvalidJson]);
    assert_eq!(fails_with(field("j", FieldType::Json), json!({"a": 1})), vec![TypeMismatch]);
}

#[test]
fn color_must_be_six_digit_hex() {
    assert!(passes(field("c", FieldType::Color), json!("#A0b1C2")));
    for bad in ["#abc", "A0B1C2", "#A0B1C2FF", "#GGGGGG"] {
        assert_eq!(fails_with(field("c", FieldType::Color), json!(bad)), vec![TypeMismatch]);
    }
}

#[test]
fn unknown_type_validates_as_text() {
    let f = field("x", FieldType::Unknown("hologram".into()));
    assert!(passes(f.clone(), json!("fine")));
    assert_eq!(fails_with(f, json!(1)), vec![TypeMismatch]);
}

// ── Constraints ──────────────────────────────────────────────────

fn bounded(field_type: FieldType, validation: FieldValidation) -> FieldDefinition {
    field("v", field_type).with_validation(validation)
}

#[test]
fn length_bounds_on_text() {
    let f = bounded(
        FieldType::Text,
        FieldValidation {
            min_length: Some(2),
            max_length: Some(4),
            ..Default::default()
        },
    );
    assert!(passes(f.clone(), json!("abc")));
    assert!(passes(f.clone(), json!("ñññ")));
    assert_eq!(fails_with(f.clone(), json!("a")), vec![OutOfRange]);
    assert_eq!(fails_with(f, json!("abcde")), vec![OutOfRange]);
}

#[test]
fn length_bounds_on_lists() {
    let f = bounded(
        FieldType::Multiselect,
        FieldValidation {
            max_length: Some(1),
            ..Default::default()
        },
    );
    assert!(passes(f.clone(), json!(["a"])));
    assert_eq!(fails_with(f, json!(["a", "b"])), vec![OutOfRange]);
}

#[test]
fn value_bounds_on_numbers_use_coerced_value() {
    let f = bounded(
        FieldType::Number,
        FieldValidation {
            min_value: Some(1.0),
            max_value: Some(10.0),
            ..Default::default()
        },
    );
    assert!(passes(f.clone(), json!("10")));
    assert_eq!(fails_with(f.clone(), json!("0.5")), vec![OutOfRange]);
    assert_eq!(fails_with(f, json!(11)), vec![OutOfRange]);
}

#[test]
fn inapplicable_constraints_are_ignored() {
    let f = bounded(
        FieldType::Boolean,
        FieldValidation {
            min_length: Some(10),
            min_value: Some(5.0),
            pattern: Some("^x$".into()),
            ..Default::default()
        },
    );
    assert!(passes(f, json!(true)));

    let f = bounded(
        FieldType::Text,
        FieldValidation {
            min_value: Some(100.0),
            ..Default::default()
        },
    );
    assert!(passes(f, json!("short")));
}

#[test]
fn pattern_on_text() {
    let f = bounded(
        FieldType::Text,
        FieldValidation {
            pattern: Some("^[A-Z]{3}-\\d+$".into()),
            ..Default::default()
        },
    );
    assert!(passes(f.clone(), json!("ABC-123")));
    assert_eq!(fails_with(f, json!("abc-123")), vec![PatternMismatch]);
}

#[test]
fn invalid_pattern_reports_instead_of_panicking() {
    let f = bounded(
        FieldType::Text,
        FieldValidation {
            pattern: Some("([unclosed".into()),
            ..Default::default()
        },
    );
    let report = generate_validator(&[f])
        .validate_value(&json!({"v": "x"}))
        .unwrap_err();
    assert_eq!(report.kinds(), vec![PatternMismatch]);
    assert!(report.issues[0].message.contains("not a valid regular expression"));
}

#[test]
fn constraints_run_after_type_check() {
    let f = bounded(
        FieldType::Email,
        FieldValidation {
            max_length: Some(3),
            ..Default::default()
        },
    );
    assert_eq!(fails_with(f, json!("nope")), vec![TypeMismatch]);
}

// ── Records ──────────────────────────────────────────────────────

#[test]
fn issues_follow_field_order_not_list_order() {
    let fields = vec![
        field("b", FieldType::Text).required(true).with_order(1),
        field("a", FieldType::Text).required(true).with_order(0),
    ];
    let report = generate_validator(&fields)
        .validate_value(&json!({}))
        .unwrap_err();
    let names: Vec<&str> = report.issues.iter().map(|i| i.field_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn extra_keys_are_ignored() {
    let fields = vec![field("a", FieldType::Text)];
    assert_eq!(kinds_for(&fields, json!({"a": "x", "zzz": 1})), vec![]);
}

#[test]
fn non_object_record_is_a_type_mismatch() {
    let report = generate_validator(&[])
        .validate_value(&json!([1, 2]))
        .unwrap_err();
    assert_eq!(report.kinds(), vec![TypeMismatch]);
    assert_eq!(report.issues[0].field_name, "");
}

#[test]
fn report_display_lists_issues() {
    let fields = vec![field("title", FieldType::Text).required(true)];
    let err = generate_validator(&fields)
        .validate_value(&json!({}))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "record failed validation: title: TITLE is required"
    );
}

#[test]
fn field_names_are_listed_in_order() {
    let fields = vec![
        field("b", FieldType::Text).with_order(1),
        field("a", FieldType::Text).with_order(0),
    ];
    let validator = generate_validator(&fields);
    assert_eq!(validator.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
}
