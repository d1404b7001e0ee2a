//! ZObject transforms
//!
//! Canonical and normal form conversions for self-describing ZObjects, plus
//! type-identity derivation, type comparison, and structured well-formedness
//! errors.
//!
//! A ZObject is a JSON value whose records carry a type tag under `Z1K1`.
//! Every value has two interchangeable encodings: a compact canonical form
//! and a fully explicit normal form in which every nested value, including
//! string and reference literals, is wrapped in a type-tagged record.
//!
//! # Example
//!
//! ```
//! use zobject::{canonicalize, normalize};
//! use serde_json::json;
//!
//! let canonical = json!({"Z1K1": "Z2", "Z2K2": ["a", "Z1"]});
//! let normal = normalize(&canonical);
//!
//! // Every nested value is wrapped in a type-tagged record; the list
//! // becomes a right-nested chain.
//! assert_eq!(normal["Z2K2"]["Z10K1"]["Z6K1"], "a");
//! assert_eq!(normal["Z2K2"]["Z10K2"]["Z10K1"]["Z9K1"], "Z1");
//!
//! // The round trip restores the compact encoding.
//! assert_eq!(canonicalize(&normal), canonical);
//! ```
//!
//! # Wire grammar
//!
//! | Construct | Canonical | Normal |
//! |-----------|-----------|--------|
//! | Reference | bare string matching `[A-Z][1-9][0-9]*` | `{"Z1K1": "Z9", "Z9K1": id}` |
//! | String | any other bare string | `{"Z1K1": "Z6", "Z6K1": text}` |
//! | List | JSON array | right-nested `Z10` records; empty list = tag only |
//! | Record | object, fields canonical | object, fields normal |
//!
//! A literal String whose text matches the reference pattern stays wrapped
//! in canonical form: collapsing it would re-read as a Reference. This
//! asymmetry is part of the grammar, and the linter flags it as `W001`.

mod aggregate;
mod canonicalize;
mod compare;
mod error;
mod export;
mod lexical;
mod linter;
mod loader;
mod normalize;
mod typekey;
mod validator;
mod value;

pub use aggregate::{create_root_error, ErrorPattern, ErrorPatternCatalog};
pub use canonicalize::canonicalize;
pub use compare::compare_types;
pub use error::{KeyError, LoadError, RawError, ValidateError};
pub use export::{export, export_canonical, export_normal, Envelope, Form};
pub use lexical::{is_global_key, is_local_key, is_reference, is_zid};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{is_url, load_zobject, load_zobject_auto, load_zobject_str};
pub use normalize::{list_items, normalize, vec_to_zlist};
pub use typekey::{TypeKey, MAX_IDENTITY_DEPTH};
pub use validator::{SchemaValidator, ValidationStatus, NORMAL_SCHEMA_ID};

#[cfg(feature = "remote")]
pub use loader::load_zobject_url;
