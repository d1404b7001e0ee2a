//! ZObject CLI
//!
//! Command-line interface for transforming, validating, and comparing
//! ZObject documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use zobject::{
    canonicalize, compare_types, export, lint, load_zobject_auto, normalize, FileStatus, Form,
    SchemaValidator, TypeKey, NORMAL_SCHEMA_ID,
};

#[derive(Parser)]
#[command(name = "zobject")]
#[command(about = "Transform, validate, and compare ZObject documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to normal form
    Normalize {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Validate well-formedness before emitting output
        #[arg(long)]
        check: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Convert a document to canonical form (accepts either form)
    Canonicalize {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Validate well-formedness before emitting output
        #[arg(long)]
        check: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check a document for well-formedness
    Validate {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Derive the type key of a document
    Key {
        /// Document source: file path or URL (http:// or https://)
        source: String,

        /// Output the key as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Compare two type descriptors ("does left satisfy right")
    Compare {
        /// Comparand document: file path or URL
        left: String,

        /// Comparator document: file path or URL
        right: String,
    },

    /// Lint document files (syntax, well-formedness, ambiguous literals)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            source,
            check,
            pretty,
            output,
        } => run_transform(Form::Normal, &source, check, pretty, output),

        Commands::Canonicalize {
            source,
            check,
            pretty,
            output,
        } => run_transform(Form::Canonical, &source, check, pretty, output),

        Commands::Validate { source, json } => run_validate(&source, json),

        Commands::Key { source, json } => run_key(&source, json),

        Commands::Compare { left, right } => run_compare(&left, &right),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_transform(
    form: Form,
    source: &str,
    check: bool,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let document = load_zobject_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let result = if check {
        let validator = SchemaValidator::builtin().map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
        let envelope = export(&document, form, &validator).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
        match envelope.result {
            Some(value) => value,
            None => {
                match envelope.error {
                    Some(error) => eprintln!("{}", error),
                    None => eprintln!("Error: document is not well-formed"),
                }
                return Err(1);
            }
        }
    } else {
        match form {
            Form::Normal => normalize(&document),
            // Normalizing first makes the command total over mixed input.
            Form::Canonical => canonicalize(&normalize(&document)),
        }
    };

    let json_output = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_validate(source: &str, json_output: bool) -> Result<(), u8> {
    let document = load_zobject_auto(source).map_err(|e| {
        report_error(json_output, &format!("loading document: {}", e));
        e.exit_code() as u8
    })?;

    let validator = SchemaValidator::builtin().map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let normal = normalize(&document);
    let status = validator
        .validate(NORMAL_SCHEMA_ID, &normal)
        .map_err(|e| {
            report_error(json_output, &e.to_string());
            e.exit_code() as u8
        })?;

    if status.is_valid() {
        if json_output {
            println!(r#"{{"valid":true,"error":null}}"#);
        } else {
            println!("Valid");
        }
        return Ok(());
    }

    if json_output {
        let output = serde_json::json!({
            "valid": false,
            "error": status.error(),
        });
        println!("{}", output);
    } else {
        eprintln!("Not well-formed:");
        for raw in status.raw_errors() {
            eprintln!("  {}", raw);
        }
    }
    Err(1)
}

fn run_key(source: &str, json_output: bool) -> Result<(), u8> {
    let document = load_zobject_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let key = TypeKey::create(&document).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if json_output {
        println!("{}", serde_json::json!({ "key": key.to_string() }));
    } else {
        println!("{}", key);
    }
    Ok(())
}

fn run_compare(left: &str, right: &str) -> Result<(), u8> {
    let comparand = load_zobject_auto(left).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    let comparator = load_zobject_auto(right).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    match compare_types(&comparand, &comparator) {
        Ok(true) => {
            println!("Compatible");
            Ok(())
        }
        Ok(false) => {
            println!("Incompatible");
            Err(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!(r#"{{"valid":false,"error":"{}"}}"#, msg);
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    use zobject::Severity;

    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let validator = SchemaValidator::builtin().map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let result = lint(path, strict, &validator);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        // Text output
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let color = match diag.severity {
                    Severity::Error => "\x1b[31m",
                    Severity::Warning => "\x1b[33m",
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color,
                        match diag.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                        },
                        diag.code,
                        diag.path,
                        diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
