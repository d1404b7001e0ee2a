//! Document validation against registered schemas.
//!
//! The schema engine is external (the `jsonschema` crate); this module owns
//! the consuming side: a registry of raw schema documents, per-call
//! compilation, and the adaptation of engine failures into the wire-shaped
//! [`RawError`] list that [`create_root_error`] aggregates.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::aggregate::{create_root_error, ErrorPatternCatalog};
use crate::error::{RawError, ValidateError};

/// Identifier the built-in normal-form schema is registered under.
pub const NORMAL_SCHEMA_ID: &str = "Z1";

const NORMAL_SCHEMA_JSON: &str = include_str!("../schemas/normal.schema.json");

/// Registry of schema documents keyed by identifier.
///
/// Schemas are stored as raw JSON and compiled on each [`validate`] call, so
/// a registered document can be replaced at any time. The catalog controls
/// how engine failures are folded into a structured ZObject error.
///
/// [`validate`]: SchemaValidator::validate
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schemas: HashMap<String, Value>,
    catalog: ErrorPatternCatalog,
}

impl SchemaValidator {
    /// Creates an empty registry with the built-in error pattern catalog.
    pub fn new() -> Self {
        SchemaValidator {
            schemas: HashMap::new(),
            catalog: ErrorPatternCatalog::builtin(),
        }
    }

    /// Creates a registry with the shipped normal-form schema registered
    /// under [`NORMAL_SCHEMA_ID`].
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::InvalidSchema` if the embedded schema document
    /// cannot be parsed.
    pub fn builtin() -> Result<Self, ValidateError> {
        let schema: Value = serde_json::from_str(NORMAL_SCHEMA_JSON)
            .map_err(|e| ValidateError::InvalidSchema {
                message: e.to_string(),
            })?;
        let mut validator = SchemaValidator::new();
        validator.register(NORMAL_SCHEMA_ID, schema);
        Ok(validator)
    }

    /// Registers a schema document under an identifier, replacing any
    /// previous document with the same identifier.
    pub fn register(&mut self, id: &str, schema: Value) {
        self.schemas.insert(id.to_string(), schema);
    }

    /// Replaces the error pattern catalog used to build structured errors.
    pub fn with_catalog(mut self, catalog: ErrorPatternCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validates a document against the schema registered under `schema_id`.
    ///
    /// An invalid document is not an `Err`: the verdict and its errors are
    /// carried by the returned [`ValidationStatus`]. `Err` is reserved for
    /// infrastructure failures.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::UnknownSchema` if no schema is registered
    /// under `schema_id`, or `ValidateError::InvalidSchema` if the registered
    /// document does not compile.
    pub fn validate(
        &self,
        schema_id: &str,
        document: &Value,
    ) -> Result<ValidationStatus, ValidateError> {
        let schema = self
            .schemas
            .get(schema_id)
            .ok_or_else(|| ValidateError::UnknownSchema {
                id: schema_id.to_string(),
            })?;

        let validator = jsonschema::validator_for(schema).map_err(|e| {
            ValidateError::InvalidSchema {
                message: e.to_string(),
            }
        })?;

        let raw_errors: Vec<RawError> = validator
            .iter_errors(document)
            .map(|e| adapt_error(&e, schema, document))
            .collect();

        Ok(ValidationStatus::new(raw_errors, &self.catalog))
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        SchemaValidator::new()
    }
}

/// Outcome of a single validation call.
#[derive(Debug, Clone)]
pub struct ValidationStatus {
    valid: bool,
    raw_errors: Vec<RawError>,
    error: Option<Value>,
}

impl ValidationStatus {
    fn new(raw_errors: Vec<RawError>, catalog: &ErrorPatternCatalog) -> Self {
        let valid = raw_errors.is_empty();
        let error = if valid {
            None
        } else {
            create_root_error(&raw_errors, catalog)
        };
        ValidationStatus {
            valid,
            raw_errors,
            error,
        }
    }

    /// Whether the document matched the schema.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The engine failures as adapted, one entry per reported violation.
    pub fn raw_errors(&self) -> &[RawError] {
        &self.raw_errors
    }

    /// The aggregated Z5 error in canonical form.
    ///
    /// `None` does not imply validity: an invalid document whose failures
    /// match no catalog pattern has a verdict but no structured error. Check
    /// [`is_valid`](ValidationStatus::is_valid) for the verdict.
    pub fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    /// Consumes the status, returning the aggregated error if any.
    pub fn into_error(self) -> Option<Value> {
        self.error
    }
}

// --- Internal implementation ---

/// Flattens one engine failure into the wire shape the aggregator consumes.
///
/// Only string-level surfaces of the engine error are used: the two paths,
/// the rendered message, and pointer lookups into the held documents. The
/// violated keyword is the last segment of the schema path; the offending
/// property names for `required` and `additionalProperties` failures are
/// recovered from the rendered message.
fn adapt_error(
    error: &jsonschema::ValidationError<'_>,
    schema: &Value,
    document: &Value,
) -> RawError {
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let keyword = schema_path.rsplit('/').next().unwrap_or("").to_string();
    let message = error.to_string();
    let data = document.pointer(&instance_path).cloned();

    let mut params = Map::new();
    let mut expected = None;
    match keyword.as_str() {
        "required" => {
            if let Some(name) = first_quoted(&message, '"') {
                params.insert("missingProperty".to_string(), Value::String(name));
            }
        }
        "additionalProperties" => {
            if let Some(name) = first_quoted(&message, '\'') {
                params.insert("additionalProperty".to_string(), Value::String(name));
            }
        }
        "type" => {
            expected = schema.pointer(&schema_path).cloned();
        }
        _ => {}
    }

    RawError {
        instance_path,
        keyword,
        params,
        data,
        expected,
        message,
    }
}

/// First substring delimited by a pair of `quote` characters, if any.
fn first_quoted(message: &str, quote: char) -> Option<String> {
    let start = message.find(quote)? + quote.len_utf8();
    let end = message[start..].find(quote)? + start;
    Some(message[start..end].to_string())
}
