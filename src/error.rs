//! Error types for ZObject loading, type identity, and validation.

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a ZObject document from disk or network.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot load {url}: URL sources require the \"remote\" feature")]
    UrlSupportDisabled { url: String },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while deriving a type identity from a ZObject.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("not a ZObject: a bare {actual} carries no type information")]
    NotAZObject { actual: &'static str },

    #[error("record has no resolvable type tag (Z1K1)")]
    MissingTypeTag,

    #[error("type identity chain exceeded {limit} levels")]
    IdentityDepthExceeded { limit: usize },

    #[error("function call has no resolvable function reference (Z7K1)")]
    UnresolvableFunction,

    #[error("type member {index} has no declared type (Z3K1)")]
    MissingDeclaredType { index: usize },
}

impl KeyError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors at the validation boundary.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("no schema registered under id \"{id}\"")]
    UnknownSchema { id: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Load(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Single raw validation failure as reported by the schema engine.
///
/// The field names follow the engine wire shape (camelCase), so raw
/// failure lists can cross a process boundary and feed the aggregator
/// unchanged.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawError {
    /// JSON Pointer (RFC 6901) to the offending value.
    #[serde(default)]
    pub instance_path: String,
    /// The schema keyword that failed ("type", "required", ...).
    #[serde(default)]
    pub keyword: String,
    /// Keyword-specific parameters, e.g. `missingProperty` for `required`.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// The offending sub-value, when the engine surfaced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Expected-type schema fragment; present for `type` failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Engine-rendered message, kept for diagnostics.
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for RawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{}: {}", path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::UrlSupportDisabled {
            url: "https://example.org/Z42.json".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn key_error_exit_codes() {
        assert_eq!(KeyError::MissingTypeTag.exit_code(), 2);
        assert_eq!(KeyError::IdentityDepthExceeded { limit: 64 }.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::UnknownSchema { id: "Z99999".into() };
        assert_eq!(err.exit_code(), 2);

        let err = ValidateError::Load(LoadError::FileNotFound {
            path: PathBuf::from("gone.json"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn raw_error_display() {
        let err = RawError {
            instance_path: "/Z2K2/Z6K1".into(),
            keyword: "type".into(),
            message: "123 is not of type \"string\"".into(),
            ..Default::default()
        };
        assert_eq!(err.to_string(), "/Z2K2/Z6K1: 123 is not of type \"string\"");

        let root = RawError {
            keyword: "required".into(),
            message: "\"Z1K1\" is a required property".into(),
            ..Default::default()
        };
        assert_eq!(root.to_string(), "/: \"Z1K1\" is a required property");
    }

    #[test]
    fn raw_error_wire_shape() {
        let wire = json!({
            "instancePath": "/Z2K2",
            "keyword": "required",
            "params": { "missingProperty": "Z1K1" },
            "message": "\"Z1K1\" is a required property"
        });
        let err: RawError = serde_json::from_value(wire).unwrap();
        assert_eq!(err.instance_path, "/Z2K2");
        assert_eq!(err.params["missingProperty"], "Z1K1");

        let back = serde_json::to_value(&err).unwrap();
        assert_eq!(back["instancePath"], "/Z2K2");
        assert!(back.get("data").is_none());
    }
}
