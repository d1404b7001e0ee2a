//! ZObject linting - static analysis of ZObject document files.
//!
//! Checks document files for:
//! - JSON syntax errors
//! - Well-formedness failures (via the normal-form schema)
//! - Root values outside the wire grammar
//! - String literals that cannot round-trip to canonical form

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::lexical::is_reference;
use crate::loader::load_zobject;
use crate::normalize::normalize;
use crate::validator::{SchemaValidator, NORMAL_SCHEMA_ID};
use crate::value::{json_type_name, record_type_zid};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/Z2K2/Z10K1")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, strict: bool, validator: &SchemaValidator) -> LintResult {
    let files = collect_document_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path, validator);
        let file_errors = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let file_warnings = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        total_errors += file_errors;
        total_warnings += file_warnings;
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single document file.
pub fn lint_file(file: &Path, base_path: &Path, validator: &SchemaValidator) -> FileResult {
    let mut diagnostics = Vec::new();

    // Try to load the file (checks syntax)
    let document = match load_zobject(file) {
        Ok(d) => d,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!("syntax error: {}", e),
            });
            return FileResult {
                file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    match &document {
        // Scalars outside the grammar never normalize into anything
        // well-formed; one diagnostic at the root covers them.
        Value::Number(_) | Value::Bool(_) | Value::Null => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E003".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!(
                    "root must be a string, array, or object, got {}",
                    json_type_name(&document)
                ),
            });
        }
        _ => {
            let normal = normalize(&document);
            match validator.validate(NORMAL_SCHEMA_ID, &normal) {
                Ok(status) => {
                    for raw in status.raw_errors() {
                        diagnostics.push(Diagnostic {
                            severity: Severity::Error,
                            code: "E002".to_string(),
                            file: file.to_path_buf(),
                            path: display_path(&raw.instance_path),
                            message: format!("not well-formed: {}", raw.message),
                        });
                    }
                }
                Err(e) => {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        code: "E002".to_string(),
                        file: file.to_path_buf(),
                        path: "/".to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    check_ambiguous_literals(&document, file, "", &mut diagnostics);

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

/// Recursively flag String records whose text matches the reference
/// pattern. Such literals stay wrapped when canonicalized, which is
/// specified but usually unintended in hand-written documents.
fn check_ambiguous_literals(
    value: &Value,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        Value::Object(map) => {
            if let Some(text) = ambiguous_literal(map) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W001".to_string(),
                    file: file.to_path_buf(),
                    path: display_path(path),
                    message: format!(
                        "string literal \"{}\" matches the reference pattern and will stay wrapped in canonical form",
                        text
                    ),
                });
            }
            for (key, val) in map {
                let child_path = format!("{}/{}", path, key);
                check_ambiguous_literals(val, file, &child_path, diagnostics);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                let child_path = format!("{}/{}", path, i);
                check_ambiguous_literals(item, file, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}

/// The literal text of a String record when it collides with the
/// reference pattern. Both tag encodings are recognized.
fn ambiguous_literal(map: &Map<String, Value>) -> Option<&str> {
    if record_type_zid(map) != Some("Z6") {
        return None;
    }
    let text = map.get("Z6K1")?.as_str()?;
    is_reference(text).then_some(text)
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_document_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn builtin() -> SchemaValidator {
        SchemaValidator::builtin().unwrap()
    }

    fn named_json(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn lint_valid_document() {
        let file = named_json(r#"{"Z1K1": "Z60", "Z60K1": "en"}"#);

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Ok);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn lint_bare_string_document() {
        let file = named_json(r#""hello""#);

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Ok);
    }

    #[test]
    fn lint_invalid_json_syntax() {
        let file = named_json("{ not valid json }");

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Error);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "E001");
    }

    #[test]
    fn lint_ill_formed_document() {
        let file = named_json(r#"{"Z1K1": "Z6", "Z6K1": 42}"#);

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Error);
        assert!(result.diagnostics.iter().any(|d| d.code == "E002"));
        let diagnostic = result.diagnostics.iter().find(|d| d.code == "E002").unwrap();
        assert_eq!(diagnostic.path, "/Z6K1");
    }

    #[test]
    fn lint_scalar_root() {
        let file = named_json("42");

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Error);
        assert!(result.diagnostics.iter().any(|d| d.code == "E003"));
        // The root diagnostic stands alone; no well-formedness noise on top.
        assert!(!result.diagnostics.iter().any(|d| d.code == "E002"));
    }

    #[test]
    fn lint_ambiguous_literal_warns() {
        let file = named_json(r#"{"Z1K1": "Z2", "Z2K2": {"Z1K1": "Z6", "Z6K1": "Z10008"}}"#);

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Warning);
        let warning = result.diagnostics.iter().find(|d| d.code == "W001").unwrap();
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.path, "/Z2K2");
        assert!(warning.message.contains("Z10008"));
    }

    #[test]
    fn lint_expanded_ambiguous_literal_warns() {
        let file = named_json(
            r#"{"Z1K1": {"Z1K1": "Z9", "Z9K1": "Z6"}, "Z6K1": "Z99"}"#,
        );

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert!(result.diagnostics.iter().any(|d| d.code == "W001"));
    }

    #[test]
    fn lint_plain_literal_does_not_warn() {
        let file = named_json(r#"{"Z1K1": "Z6", "Z6K1": "hello"}"#);

        let result = lint_file(file.path(), file.path().parent().unwrap(), &builtin());
        assert_eq!(result.status, FileStatus::Ok);
    }

    #[test]
    fn lint_directory() {
        let dir = tempdir().unwrap();

        let valid_path = dir.path().join("valid.json");
        std::fs::write(&valid_path, r#"{"Z1K1": "Z60", "Z60K1": "en"}"#).unwrap();

        let invalid_path = dir.path().join("invalid.json");
        std::fs::write(&invalid_path, "{ not json }").unwrap();

        let result = lint(dir.path(), false, &builtin());
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert!(!result.is_ok());
    }

    #[test]
    fn lint_strict_mode() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("ambiguous.json");
        // Document with warning only (ambiguous literal)
        std::fs::write(&file_path, r#"{"Z1K1": "Z6", "Z6K1": "Z1"}"#).unwrap();

        // Non-strict: warnings don't cause failure
        let result = lint(&file_path, false, &builtin());
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 0);

        // Strict: warnings cause failure
        let result = lint(&file_path, true, &builtin());
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.passed, 0);
        assert_eq!(result.failed, 1);
    }

    #[test]
    fn lint_collects_nested_files_sorted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.json"), r#""Z1""#).unwrap();
        std::fs::write(dir.path().join("sub/a.json"), r#""Z2""#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = lint(dir.path(), false, &builtin());
        assert_eq!(result.files_checked, 2);
        assert!(result.results[0].file.ends_with("b.json"));
        assert!(result.results[1].file.ends_with("sub/a.json"));
    }
}
