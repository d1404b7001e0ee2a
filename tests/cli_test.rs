//! CLI integration tests for the zobject binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("zobject"))
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod normalize_command {
    use super::*;

    #[test]
    fn basic_normalize() {
        cmd()
            .args(["normalize", "tests/fixtures/label.json"])
            .assert()
            .success()
            // The type tag expands into a reference record
            .stdout(predicate::str::contains(r#""Z9K1":"Z11""#))
            .stdout(predicate::str::contains(r#""Z6K1":"Hello""#));
    }

    #[test]
    fn normalize_with_pretty() {
        cmd()
            .args(["normalize", "tests/fixtures/label.json", "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn normalize_with_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("normal.json");

        cmd()
            .args([
                "normalize",
                "tests/fixtures/label.json",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""Z9K1":"Z11""#));
    }

    #[test]
    fn normalize_check_passes_well_formed() {
        cmd()
            .args(["normalize", "tests/fixtures/label.json", "--check"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Z9K1":"Z11""#));
    }

    #[test]
    fn normalize_check_rejects_ill_formed() {
        cmd()
            .args(["normalize", "tests/fixtures/bad_string.json", "--check"])
            .assert()
            .code(1)
            // The structured error lands on stderr, not stdout
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Z502"));
    }

    #[test]
    fn normalize_without_check_passes_anything_through() {
        cmd()
            .args(["normalize", "tests/fixtures/bad_string.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Z6K1":42"#));
    }
}

mod canonicalize_command {
    use super::*;

    #[test]
    fn basic_canonicalize() {
        cmd()
            .args(["canonicalize", "tests/fixtures/label_normal.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Z1K1":"Z11""#))
            .stdout(predicate::str::contains(r#""Z9K1""#).not());
    }

    #[test]
    fn canonicalize_accepts_canonical_input() {
        // Canonical input comes back unchanged.
        cmd()
            .args(["canonicalize", "tests/fixtures/label.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"Hello"}"#,
            ));
    }

    #[test]
    fn canonicalize_keeps_ambiguous_literal_wrapped() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "ambiguous.json", r#"{"Z1K1": "Z6", "Z6K1": "Z1"}"#);

        cmd()
            .args(["canonicalize", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"Z1K1":"Z6","Z6K1":"Z1"}"#));
    }

    #[test]
    fn canonicalize_flattens_lists() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "list.json", r#"{"Z1K1": "Z2", "Z2K2": ["a", "Z1"]}"#);

        cmd()
            .args(["canonicalize", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Z2K2":["a","Z1"]"#));
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn validate_well_formed_document() {
        cmd()
            .args(["validate", "tests/fixtures/label.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn validate_ill_formed_document() {
        cmd()
            .args(["validate", "tests/fixtures/bad_string.json"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Not well-formed"));
    }

    #[test]
    fn validate_json_output_valid() {
        cmd()
            .args(["validate", "tests/fixtures/label.json", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"valid":true,"error":null}"#));
    }

    #[test]
    fn validate_json_output_invalid() {
        cmd()
            .args(["validate", "tests/fixtures/bad_string.json", "--json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains("Z502"));
    }
}

mod key_command {
    use super::*;

    #[test]
    fn key_of_generic_instance() {
        cmd()
            .args(["key", "tests/fixtures/typed_list.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Z881(Z6)"));
    }

    #[test]
    fn key_of_user_defined_type() {
        cmd()
            .args(["key", "tests/fixtures/pair_type.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("<Z6,Z40>"));
    }

    #[test]
    fn key_of_reference() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "ref.json", r#""Z40""#);

        cmd()
            .args(["key", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Z40"));
    }

    #[test]
    fn key_json_output() {
        cmd()
            .args(["key", "tests/fixtures/typed_list.json", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"key":"Z881(Z6)"}"#));
    }

    #[test]
    fn key_of_non_zobject_fails() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "plain.json", r#""hello""#);

        cmd()
            .args(["key", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not a ZObject"));
    }
}

mod compare_command {
    use super::*;

    #[test]
    fn identical_references_are_compatible() {
        let dir = TempDir::new().unwrap();
        let left = write_temp_file(&dir, "left.json", r#""Z40""#);
        let right = write_temp_file(&dir, "right.json", r#""Z40""#);

        cmd()
            .args(["compare", left.to_str().unwrap(), right.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Compatible"));
    }

    #[test]
    fn distinct_references_are_incompatible() {
        let dir = TempDir::new().unwrap();
        let left = write_temp_file(&dir, "left.json", r#""Z40""#);
        let right = write_temp_file(&dir, "right.json", r#""Z60""#);

        cmd()
            .args(["compare", left.to_str().unwrap(), right.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Incompatible"));
    }

    #[test]
    fn anything_satisfies_the_top_type() {
        let dir = TempDir::new().unwrap();
        let left = write_temp_file(&dir, "left.json", r#""Z60""#);
        let top = write_temp_file(&dir, "top.json", r#""Z1""#);

        cmd()
            .args(["compare", left.to_str().unwrap(), top.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Compatible"));
    }

    #[test]
    fn generic_short_circuits_comparison() {
        let dir = TempDir::new().unwrap();
        let generic = write_temp_file(
            &dir,
            "generic.json",
            r#"{"Z1K1": "Z7", "Z7K1": "Z881", "Z881K1": "Z6"}"#,
        );
        let other = write_temp_file(&dir, "other.json", r#""Z40""#);

        cmd()
            .args(["compare", generic.to_str().unwrap(), other.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Compatible"));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn lint_clean_file() {
        cmd()
            .args(["lint", "tests/fixtures/label.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("all passed"));
    }

    #[test]
    fn lint_ill_formed_file() {
        cmd()
            .args(["lint", "tests/fixtures/bad_string.json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"));
    }

    #[test]
    fn lint_directory_with_mixed_files() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "good.json", r#"{"Z1K1": "Z60", "Z60K1": "en"}"#);
        write_temp_file(&dir, "broken.json", "{ not json }");

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E001"));
    }

    #[test]
    fn lint_json_format() {
        cmd()
            .args(["lint", "tests/fixtures/label.json", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""files_checked""#));
    }

    #[test]
    fn lint_strict_promotes_warnings() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "ambiguous.json", r#"{"Z1K1": "Z6", "Z6K1": "Z1"}"#);

        cmd()
            .args(["lint", doc.to_str().unwrap()])
            .assert()
            .success();

        cmd()
            .args(["lint", doc.to_str().unwrap(), "--strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("W001"));
    }

    #[test]
    fn lint_missing_path() {
        cmd()
            .args(["lint", "/nonexistent/documents"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("path not found"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["normalize", "/nonexistent/document.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json_document() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["canonicalize", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_source_for_normalize() {
        cmd().arg("normalize").assert().failure();
    }

    #[test]
    fn missing_comparator_for_compare() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "left.json", r#""Z40""#);

        cmd()
            .args(["compare", doc.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("RIGHT"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Transform, validate, and compare ZObject documents",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("zobject"));
    }

    #[test]
    fn normalize_help() {
        cmd()
            .args(["normalize", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--check"))
            .stdout(predicate::str::contains("--pretty"))
            .stdout(predicate::str::contains("--output"));
    }

    #[test]
    fn lint_help() {
        cmd()
            .args(["lint", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--strict"))
            .stdout(predicate::str::contains("--format"));
    }
}

/// Remote document loading tests - served from a local mock server
mod remote {
    use super::*;

    #[test]
    fn normalize_from_url() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/label.json")
            .with_status(200)
            .with_body(r#"{"Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": "Hi"}"#)
            .create();

        cmd()
            .args(["normalize", &format!("{}/label.json", server.url())])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""Z9K1":"Z11""#));
    }

    #[test]
    fn url_fetch_failure_is_io_error() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/gone.json").with_status(404).create();

        cmd()
            .args(["validate", &format!("{}/gone.json", server.url())])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
