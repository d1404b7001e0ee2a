//! Aggregation of raw validation failures into one structured error.
//!
//! The schema engine reports a flat list of failures with JSON-pointer
//! paths. `create_root_error` folds that list into a single path-nested
//! `Z5` error value (canonical form): each failure is matched against a
//! pattern catalog, deduplicated, attached to the node its global-key
//! path reaches, and the tree is collapsed bottom-up into nested
//! not-wellformed wrappers.
//!
//! The aggregator never raises. Failures matching no catalog pattern
//! are dropped; if nothing survives, the result is `None` and callers
//! must treat an invalid document with a `None` error as failed without
//! a descriptive error, never as success.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::error::RawError;
use crate::lexical::is_global_key;
use crate::value::json_type_name;

/// One catalog entry: which raw failures it claims and the error type
/// their structured form carries.
///
/// All constraint fields are optional; an unset constraint passes. For
/// `type` failures the data-kind whitelist and the expected fragment
/// are alternatives: one of the two has to hit when either is set.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorPattern {
    /// Failure keyword this pattern applies to.
    pub keyword: String,
    /// Instance-path suffix the failure has to sit under, e.g. `/Z1K1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// JSON type names of offending values this pattern claims.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_kinds: Vec<String>,
    /// Expected-type fragment that must equal the failure's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Exact missing-property name for `required` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_property: Option<String>,
    /// Error type ZID of the structured form.
    pub error_type: String,
}

/// Immutable, ordered pattern table. First match wins.
#[derive(Debug, Clone)]
pub struct ErrorPatternCatalog {
    patterns: Vec<ErrorPattern>,
}

impl ErrorPatternCatalog {
    /// The shipped catalog, covering the failures the structural
    /// NORMAL-form schema can produce: `required`, `type`, and
    /// `additionalProperties`.
    pub fn builtin() -> Self {
        ErrorPatternCatalog {
            patterns: builtin_patterns(),
        }
    }

    /// Loads a catalog from configuration data (a JSON array of
    /// patterns in wire shape).
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        Ok(ErrorPatternCatalog {
            patterns: serde_json::from_value(value)?,
        })
    }

    /// Loads a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(ErrorPatternCatalog {
            patterns: serde_json::from_str(text)?,
        })
    }

    /// The ordered patterns.
    pub fn patterns(&self) -> &[ErrorPattern] {
        &self.patterns
    }

    fn find(&self, raw: &RawError) -> Option<(usize, &ErrorPattern)> {
        self.patterns
            .iter()
            .enumerate()
            .find(|(_, pattern)| pattern_matches(pattern, raw))
    }
}

impl Default for ErrorPatternCatalog {
    fn default() -> Self {
        ErrorPatternCatalog::builtin()
    }
}

/// Folds a flat raw failure list into one structured `Z5` error value.
///
/// Returns `None` when the list is empty or nothing matched the
/// catalog. The result is wrapped in the top-level not-wellformed error
/// (`Z502`); every level of nesting below mirrors the global-key path
/// of the failures it aggregates.
pub fn create_root_error(
    raw_errors: &[RawError],
    catalog: &ErrorPatternCatalog,
) -> Option<Value> {
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut root = ErrorNode::default();

    for raw in raw_errors {
        let (index, pattern) = match catalog.find(raw) {
            Some(matched) => matched,
            None => continue,
        };
        if !seen.insert((raw.instance_path.clone(), index)) {
            continue;
        }
        root.attach(&path_segments(&raw.instance_path), structured_leaf(pattern, raw));
    }

    aggregate_node(root).map(not_wellformed)
}

// --- Internal implementation ---

fn pattern_matches(pattern: &ErrorPattern, raw: &RawError) -> bool {
    if pattern.keyword != raw.keyword {
        return false;
    }
    if let Some(suffix) = &pattern.suffix {
        if !raw.instance_path.ends_with(suffix.as_str()) {
            return false;
        }
    }
    if let Some(name) = &pattern.missing_property {
        let missing = raw.params.get("missingProperty").and_then(Value::as_str);
        if missing != Some(name.as_str()) {
            return false;
        }
    }
    if !pattern.data_kinds.is_empty() || pattern.expected.is_some() {
        let kind_hit = match &raw.data {
            Some(data) => {
                let kind = json_type_name(data);
                pattern.data_kinds.iter().any(|k| k == kind)
            }
            None => false,
        };
        let expected_hit = match (&pattern.expected, &raw.expected) {
            (Some(configured), Some(reported)) => configured == reported,
            _ => false,
        };
        if !kind_hit && !expected_hit {
            return false;
        }
    }
    true
}

fn builtin_patterns() -> Vec<ErrorPattern> {
    let not_a_tag = vec![
        "array".to_string(),
        "boolean".to_string(),
        "null".to_string(),
        "number".to_string(),
    ];
    let not_a_string = vec![
        "array".to_string(),
        "boolean".to_string(),
        "null".to_string(),
        "number".to_string(),
        "object".to_string(),
    ];
    let not_a_record = vec![
        "array".to_string(),
        "boolean".to_string(),
        "null".to_string(),
        "number".to_string(),
        "string".to_string(),
    ];
    vec![
        // Missing type tag beats the generic missing-key form.
        ErrorPattern {
            keyword: "required".into(),
            missing_property: Some("Z1K1".into()),
            error_type: "Z523".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "required".into(),
            error_type: "Z511".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "type".into(),
            suffix: Some("/Z1K1".into()),
            data_kinds: not_a_tag,
            expected: Some(json!(["string", "object"])),
            error_type: "Z524".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "type".into(),
            suffix: Some("/Z6K1".into()),
            data_kinds: not_a_string.clone(),
            expected: Some(json!("string")),
            error_type: "Z528".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "type".into(),
            suffix: Some("/Z9K1".into()),
            data_kinds: not_a_string,
            expected: Some(json!("string")),
            error_type: "Z530".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "type".into(),
            data_kinds: not_a_record,
            expected: Some(json!("object")),
            error_type: "Z522".into(),
            ..Default::default()
        },
        ErrorPattern {
            keyword: "additionalProperties".into(),
            error_type: "Z525".into(),
            ..Default::default()
        },
    ]
}

/// The ordered global keys an instance path passes through. Array
/// indices and local keys do not open nesting levels.
fn path_segments(instance_path: &str) -> Vec<&str> {
    instance_path
        .split('/')
        .filter(|segment| is_global_key(segment))
        .collect()
}

#[derive(Debug, Default)]
struct ErrorNode {
    children: Vec<(String, ErrorNode)>,
    errors: Vec<Value>,
}

impl ErrorNode {
    fn attach(&mut self, segments: &[&str], error: Value) {
        match segments.split_first() {
            None => self.errors.push(error),
            Some((head, rest)) => {
                let index = match self
                    .children
                    .iter()
                    .position(|(key, _)| key.as_str() == *head)
                {
                    Some(found) => found,
                    None => {
                        self.children.push(((*head).to_string(), ErrorNode::default()));
                        self.children.len() - 1
                    }
                };
                self.children[index].1.attach(rest, error);
            }
        }
    }
}

fn aggregate_node(node: ErrorNode) -> Option<Value> {
    let mut items = node.errors;
    for (key, child) in node.children {
        if let Some(child_error) = aggregate_node(child) {
            items.push(key_not_wellformed(&key, child_error));
        }
    }
    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(multiple_errors(items)),
    }
}

/// Builds the structured form for one matched failure. Known error
/// types get specific payload shapes; anything else quotes the
/// offending data.
fn structured_leaf(pattern: &ErrorPattern, raw: &RawError) -> Value {
    let zid = pattern.error_type.as_str();
    let data = raw.data.clone().unwrap_or(Value::Null);
    match zid {
        // Missing key: the key name plus the object it is missing from.
        "Z511" => {
            let missing = raw
                .params
                .get("missingProperty")
                .and_then(Value::as_str)
                .unwrap_or_default();
            z5(
                zid,
                json!({
                    "Z1K1": "Z511",
                    "Z511K1": key_reference(missing),
                    "Z511K2": quote(&data),
                }),
            )
        }
        // Invalid key: the unexpected key name when the engine named it.
        "Z525" => match raw.params.get("additionalProperty").and_then(Value::as_str) {
            Some(extra) => z5(zid, json!({"Z1K1": "Z525", "Z525K1": key_reference(extra)})),
            None => z5(zid, json!({"Z1K1": "Z525", "Z525K1": quote(&data)})),
        },
        // Mis-shaped values quote the offender under the type's first key.
        "Z522" | "Z523" | "Z524" | "Z528" | "Z530" => {
            let mut payload = Map::new();
            payload.insert("Z1K1".to_string(), json!(zid));
            payload.insert(format!("{zid}K1"), quote(&data));
            z5(zid, Value::Object(payload))
        }
        _ => z5(zid, quote(&data)),
    }
}

fn z5(error_type: &str, value: Value) -> Value {
    json!({"Z1K1": "Z5", "Z5K1": error_type, "Z5K2": value})
}

fn quote(value: &Value) -> Value {
    json!({"Z1K1": "Z99", "Z99K1": value})
}

fn key_reference(key: &str) -> Value {
    json!({"Z1K1": "Z39", "Z39K1": key})
}

fn not_wellformed(child: Value) -> Value {
    z5("Z502", json!({"Z1K1": "Z502", "Z502K1": child}))
}

fn key_not_wellformed(key: &str, child: Value) -> Value {
    z5(
        "Z526",
        json!({"Z1K1": "Z526", "Z526K1": key_reference(key), "Z526K2": child}),
    )
}

fn multiple_errors(items: Vec<Value>) -> Value {
    z5("Z509", json!({"Z1K1": "Z509", "Z509K1": items}))
}
