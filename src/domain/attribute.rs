// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Declarations and the Attribute Catalog
//!
//! An [`Attribute`] is a named, typed field declaration. Kinds and mixins
//! carry sets of attributes; builders use them to type-check inbound values.
//!
//! The [`AttributeCatalog`] is the registry of every declaration known to the
//! engine. The built-in catalog is created once on first access and is
//! read-only afterwards, so it can be shared freely across threads.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::identifiers::attributes as names;
use crate::errors::{OcciError, OcciResult};

/// Declared value type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Integer,
    Float,
    /// Closed set of literals, matched case-insensitively and stored in
    /// their declared spelling
    Enum { values: Vec<String> },
}

impl AttributeType {
    /// Build an enum type from literals
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Enum { values } => write!(f, "one of [{}]", values.join(", ")),
        }
    }
}

/// Typed attribute value produced by [`Attribute::parse`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Enum(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// JSON form used by renderings
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) | Self::Enum(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Enum(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Named, typed attribute declaration
///
/// Identity is the name. Declarations are immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    name: String,

    #[serde(rename = "type")]
    value_type: AttributeType,

    #[serde(default)]
    required: bool,

    #[serde(default = "default_mutable")]
    mutable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn default_mutable() -> bool {
    true
}

impl Attribute {
    /// Declare an optional, mutable attribute
    pub fn new(name: impl Into<String>, value_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: false,
            mutable: true,
            description: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Float)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, AttributeType::enumeration(values))
    }

    /// Mark the attribute as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the attribute as set-once
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &AttributeType {
        &self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Type-check a raw wire value against this declaration
    ///
    /// `null` reads as absent. Integers and floats also accept numeric
    /// strings, since the automation store hands every variable back as text.
    pub fn parse(&self, raw: &Value) -> OcciResult<Option<AttributeValue>> {
        if raw.is_null() {
            return Ok(None);
        }

        let parsed = match &self.value_type {
            AttributeType::String => match raw {
                Value::String(s) => AttributeValue::String(s.clone()),
                Value::Number(n) => AttributeValue::String(n.to_string()),
                Value::Bool(b) => AttributeValue::String(b.to_string()),
                _ => return Err(self.type_error(raw)),
            },
            AttributeType::Integer => {
                let value = match raw {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                AttributeValue::Integer(value.ok_or_else(|| self.type_error(raw))?)
            }
            AttributeType::Float => {
                let value = match raw {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|v| v.is_finite());
                AttributeValue::Float(value.ok_or_else(|| self.type_error(raw))?)
            }
            AttributeType::Enum { values } => {
                let Value::String(s) = raw else {
                    return Err(self.type_error(raw));
                };
                let literal = values
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| OcciError::InvalidAttributeValue {
                        name: self.name.clone(),
                        reason: format!("{s:?} is not one of [{}]", values.join(", ")),
                    })?;
                AttributeValue::Enum(literal.clone())
            }
        };

        Ok(Some(parsed))
    }

    fn type_error(&self, raw: &Value) -> OcciError {
        OcciError::InvalidAttributeType {
            name: self.name.clone(),
            expected: self.value_type.to_string(),
            found: describe_json(raw),
        }
    }
}

fn describe_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Registry of attribute declarations keyed by name
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    attributes: IndexMap<String, Attribute>,
}

impl AttributeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration
    ///
    /// Registering an identical declaration twice is a no-op; registering a
    /// name already bound to a different value type fails.
    pub fn register(&mut self, attribute: Attribute) -> OcciResult<()> {
        if let Some(existing) = self.attributes.get(attribute.name()) {
            if existing.value_type() != attribute.value_type() {
                return Err(OcciError::DuplicateAttribute(attribute.name));
            }
            return Ok(());
        }
        self.attributes.insert(attribute.name.clone(), attribute);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> OcciResult<&Attribute> {
        self.attributes
            .get(name)
            .ok_or_else(|| OcciError::UnknownAttribute(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// The declarations shipped with the engine
    pub fn builtin() -> OcciResult<Self> {
        let mut catalog = Self::new();
        for attribute in builtin_attributes() {
            catalog.register(attribute)?;
        }
        Ok(catalog)
    }
}

fn builtin_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string(names::ID)
            .required()
            .immutable()
            .describe("Unique identifier of the instance"),
        Attribute::string(names::TITLE).describe("Display name of the instance"),
        Attribute::string(names::SUMMARY).describe("Summary of the resource instance"),
        Attribute::string(names::SOURCE)
            .required()
            .describe("Resource instance the link originates from"),
        Attribute::string(names::TARGET)
            .required()
            .describe("Resource instance the link points to"),
        Attribute::enumeration(names::ARCHITECTURE, ["X86", "X64"])
            .describe("CPU architecture of the instance"),
        Attribute::integer(names::CORES).describe("Number of virtual CPU cores"),
        Attribute::integer(names::SHARE).describe("Relative number of CPU shares"),
        Attribute::string(names::HOSTNAME).describe("Fully qualified hostname"),
        Attribute::float(names::MEMORY).describe("Maximum RAM in gigabytes"),
        Attribute::enumeration(names::STATE, ["ACTIVE", "INACTIVE", "SUSPENDED", "ERROR"])
            .describe("Current state of the instance"),
        Attribute::string(names::STATE_MESSAGE).describe("Human-readable state explanation"),
        Attribute::string(names::USERDATA)
            .required()
            .immutable()
            .describe("Contextualization data supplied once at creation"),
        Attribute::string(names::SSH_PUBLIC_KEY)
            .required()
            .describe("SSH public key injected into the instance"),
        Attribute::enumeration(names::COMPONENT_STATE, ["ACTIVE", "INACTIVE", "ERROR"])
            .describe("Current state of the platform component"),
    ]
}

/// Built-in attribute catalog
pub static CATALOG: Lazy<AttributeCatalog> = Lazy::new(|| {
    AttributeCatalog::builtin().expect("built-in attribute declarations must be consistent")
});

/// Look up a built-in declaration by wire name
pub fn attribute(name: &str) -> OcciResult<&'static Attribute> {
    CATALOG.lookup(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = AttributeCatalog::new();
        catalog.register(Attribute::integer("x.count")).unwrap();

        assert_eq!(catalog.lookup("x.count").unwrap().value_type(), &AttributeType::Integer);
        assert!(matches!(
            catalog.lookup("x.missing"),
            Err(OcciError::UnknownAttribute(name)) if name == "x.missing"
        ));
    }

    #[test]
    fn test_register_identical_is_noop() {
        let mut catalog = AttributeCatalog::new();
        catalog.register(Attribute::string("x.name")).unwrap();
        catalog.register(Attribute::string("x.name")).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_register_conflicting_type_fails() {
        let mut catalog = AttributeCatalog::new();
        catalog.register(Attribute::string("x.name")).unwrap();
        assert!(matches!(
            catalog.register(Attribute::float("x.name")),
            Err(OcciError::DuplicateAttribute(_))
        ));
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        assert!(CATALOG.contains(names::CORES));
        assert!(CATALOG.lookup(names::USERDATA).unwrap().is_required());
        assert!(!CATALOG.lookup(names::ID).unwrap().is_mutable());
    }

    #[test_case(json!("2"), 2 ; "numeric string")]
    #[test_case(json!(4), 4 ; "number")]
    #[test_case(json!(" 8 "), 8 ; "padded string")]
    fn test_parse_integer(raw: Value, expected: i64) {
        let parsed = Attribute::integer("n").parse(&raw).unwrap().unwrap();
        assert_eq!(parsed.as_i64(), Some(expected));
    }

    #[test_case(json!("two") ; "word")]
    #[test_case(json!(1.5) ; "fraction")]
    #[test_case(json!([1]) ; "array")]
    fn test_parse_integer_rejects(raw: Value) {
        assert!(matches!(
            Attribute::integer("n").parse(&raw),
            Err(OcciError::InvalidAttributeType { .. })
        ));
    }

    #[test]
    fn test_parse_float() {
        let attr = Attribute::float("m");
        assert_eq!(attr.parse(&json!("2.5")).unwrap().unwrap().as_f64(), Some(2.5));
        assert_eq!(attr.parse(&json!(4)).unwrap().unwrap().as_f64(), Some(4.0));
        assert!(attr.parse(&json!("NaN")).is_err());
    }

    #[test]
    fn test_parse_enum_normalizes_case() {
        let attr = Attribute::enumeration("a", ["X86", "X64"]);
        assert_eq!(
            attr.parse(&json!("x64")).unwrap(),
            Some(AttributeValue::Enum("X64".to_string()))
        );
        assert!(matches!(
            attr.parse(&json!("ARM")),
            Err(OcciError::InvalidAttributeValue { .. })
        ));
        assert!(matches!(
            attr.parse(&json!(64)),
            Err(OcciError::InvalidAttributeType { .. })
        ));
    }

    #[test]
    fn test_parse_null_is_absent() {
        assert_eq!(Attribute::string("s").parse(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_declaration_serde_shape() {
        let attr = Attribute::enumeration("a", ["X86"]).required();
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["type"]["kind"], "enum");
        assert_eq!(json["required"], true);

        let back: Attribute = serde_json::from_value(json!({
            "name": "b",
            "type": { "kind": "integer" }
        }))
        .unwrap();
        assert!(!back.is_required());
        assert!(back.is_mutable());
    }
}
