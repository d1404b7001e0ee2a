//! Export boundary: the well-formedness gate in front of the transforms.
//!
//! The pure transforms assume well-formed input; this module is where that
//! assumption is enforced. An export normalizes the document, validates the
//! normal form, and returns a result/error pair instead of raising, so
//! callers can hand failures around as ordinary data.

use serde::Serialize;
use serde_json::Value;

use crate::canonicalize::canonicalize;
use crate::error::ValidateError;
use crate::normalize::normalize;
use crate::validator::{SchemaValidator, NORMAL_SCHEMA_ID};

/// Requested output encoding of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Compact encoding: bare strings and plain arrays.
    Canonical,
    /// Fully explicit encoding: every value wrapped in a tagged record.
    Normal,
}

/// Result/error pair produced by the export entry points.
///
/// At most one side is set. A well-formed document yields `result`; an
/// ill-formed one yields the aggregated error in canonical form under
/// `error`. When the failures matched no error pattern both sides are
/// empty and the export still counts as failed, so check
/// [`is_ok`](Envelope::is_ok) rather than `error`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub result: Option<Value>,
    pub error: Option<Value>,
}

impl Envelope {
    /// Whether the export produced a result.
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// Exports a document in the requested form.
///
/// The input may be in canonical form, normal form, or any mixture; it is
/// normalized first and the normal form is validated before any output is
/// produced. Well-formedness failures are data, not errors: they come back
/// inside the envelope.
///
/// # Errors
///
/// Returns `ValidateError` only for infrastructure failures (an unusable
/// schema registry), never for an ill-formed document.
pub fn export(
    document: &Value,
    form: Form,
    validator: &SchemaValidator,
) -> Result<Envelope, ValidateError> {
    let normal = normalize(document);
    let status = validator.validate(NORMAL_SCHEMA_ID, &normal)?;
    if !status.is_valid() {
        return Ok(Envelope {
            result: None,
            error: status.into_error(),
        });
    }
    let result = match form {
        Form::Canonical => canonicalize(&normal),
        Form::Normal => normal,
    };
    Ok(Envelope {
        result: Some(result),
        error: None,
    })
}

/// Exports a document in normal form. See [`export`].
pub fn export_normal(
    document: &Value,
    validator: &SchemaValidator,
) -> Result<Envelope, ValidateError> {
    export(document, Form::Normal, validator)
}

/// Exports a document in canonical form. See [`export`].
pub fn export_canonical(
    document: &Value,
    validator: &SchemaValidator,
) -> Result<Envelope, ValidateError> {
    export(document, Form::Canonical, validator)
}
