use clap::Parser;
use modelkit_cli::{Cli, Command, load_model, load_records, run};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn model_json() -> Value {
    json!({
        "name": "contact",
        "display_name": "Contact",
        "site": 3,
        "fields": [
            {"name": "email", "label": "Email", "type": "email", "required": true, "order": 0},
            {"name": "score", "label": "Score", "type": "rating", "order": 1},
            {"name": "newsletter", "label": "Newsletter", "type": "boolean",
             "default_value": false, "order": 2}
        ]
    })
}

fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn run_to_string(command: Command) -> (bool, String) {
    let mut out = Vec::new();
    let passed = run(command, &mut out).unwrap();
    (passed, String::from_utf8(out).unwrap())
}

// ── Argument parsing ─────────────────────────────────────────────

#[test]
fn parses_subcommands() {
    let cli = Cli::try_parse_from(["modelkit", "-v", "validate", "m.json", "d.json"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(
        cli.command,
        Command::Validate {
            model: "m.json".into(),
            data: "d.json".into(),
            no_defaults: false,
        }
    );

    let cli = Cli::try_parse_from(["modelkit", "preview", "m.json", "--rows", "5"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Preview {
            model: "m.json".into(),
            rows: 5,
            date_format: None,
        }
    );
}

#[test]
fn rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["modelkit", "validate", "m.json"]).is_err());
    assert!(Cli::try_parse_from(["modelkit"]).is_err());
}

// ── types ────────────────────────────────────────────────────────

#[test]
fn types_lists_every_known_type() {
    let (passed, out) = run_to_string(Command::Types { json: false });
    assert!(passed);
    assert_eq!(out.lines().count(), 21);
    assert!(out.lines().any(|l| l.starts_with("rating") && l.contains("rating_stars")));
}

#[test]
fn types_as_json() {
    let (_, out) = run_to_string(Command::Types { json: true });
    let rows: Vec<Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(rows.len(), 20);
    let gallery = rows.iter().find(|r| r["tag"] == "gallery").unwrap();
    assert_eq!(gallery["value_shape"], "reference_list");
    assert_eq!(gallery["file_like"], true);
}

// ── check ────────────────────────────────────────────────────────

#[test]
fn check_accepts_valid_model() {
    let dir = TempDir::new().unwrap();
    let model = write(&dir, "model.json", &model_json());
    let (passed, out) = run_to_string(Command::Check { model });
    assert!(passed);
    assert_eq!(out.trim(), "ok: model 'contact' (3 fields)");
}

#[test]
fn check_reports_duplicate_names() {
    let dir = TempDir::new().unwrap();
    let mut value = model_json();
    value["fields"][1]["name"] = json!("email");
    let model = write(&dir, "model.json", &value);

    let (passed, out) = run_to_string(Command::Check { model });
    assert!(!passed);
    assert!(out.starts_with("error:"));
    assert!(out.contains("email"));
}

#[test]
fn unreadable_model_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let err = run(Command::Check { model: missing }, &mut Vec::<u8>::new()).unwrap_err();
    assert!(err.to_string().contains("failed to read model file"));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{\"name\": 1}").unwrap();
    assert!(load_model(&bad).is_err());
}

// ── validate ─────────────────────────────────────────────────────

#[test]
fn validate_reports_each_record() {
    let dir = TempDir::new().unwrap();
    let model = write(&dir, "model.json", &model_json());
    let data = write(
        &dir,
        "data.json",
        &json!([
            {"email": "a@b.com", "score": 5},
            {"email": "not-an-email", "score": 6}
        ]),
    );

    let (passed, out) = run_to_string(Command::Validate {
        model,
        data,
        no_defaults: false,
    });
    assert!(!passed);

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "record 1: ok");
    assert_eq!(lines[1], "record 2: 2 issue(s)");
    assert!(lines[2].starts_with("  email: type mismatch"));
    assert!(lines[3].starts_with("  score: out of range"));
}

#[test]
fn validate_single_record_passes() {
    let dir = TempDir::new().unwrap();
    let model = write(&dir, "model.json", &model_json());
    let data = write(&dir, "data.json", &json!({"email": "a@b.com"}));

    let (passed, out) = run_to_string(Command::Validate {
        model,
        data,
        no_defaults: true,
    });
    assert!(passed);
    assert_eq!(out.trim(), "record 1: ok");
}

#[test]
fn records_must_be_objects() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "data.json", &json!([{"a": 1}, 2]));
    let err = load_records(&path).unwrap_err();
    assert!(err.to_string().contains("record #2"));

    let path = write(&dir, "scalar.json", &json!("text"));
    assert!(load_records(&path).is_err());
}

// ── preview ──────────────────────────────────────────────────────

#[test]
fn preview_prints_json() {
    let dir = TempDir::new().unwrap();
    let model = write(&dir, "model.json", &model_json());

    let (passed, out) = run_to_string(Command::Preview {
        model,
        rows: 2,
        date_format: None,
    });
    assert!(passed);

    let preview: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(preview["form"].as_array().unwrap().len(), 3);
    assert_eq!(preview["form"][0]["control"], "email_input");
    assert_eq!(preview["table"]["sample_rows"].as_array().unwrap().len(), 2);
    assert_eq!(preview["table"]["columns"][2]["format"], "yes_no_badge");
}
