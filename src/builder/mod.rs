// Copyright (c) 2025 - Cowboy AI, Inc.
//! Builder Pipeline
//!
//! Turns untyped attribute maps into typed entities.
//!
//! ```text
//! EntityRequest / Model
//!     ↓
//! BuilderRegistry (kind model name → builder, Resource fallback)
//!     ↓
//! EntityBuilder::read_attributes (type-checks declared attributes)
//!     ↓
//! EntityBuilder::attach_mixins (applies / duplicates / depends)
//!     ↓
//! EntityBuilder::build_entity → OcciEntity
//! ```
//!
//! Builders are per-request values. `build_entity` borrows the builder, so
//! calling it twice yields value-equal entities.

pub mod dispatch;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::attribute::{attribute, AttributeValue};
use crate::domain::{Kind, Mixin};
use crate::entity::{EntityId, OcciEntity};
use crate::errors::{OcciError, OcciResult};

pub use dispatch::{BuilderFactory, BuilderRegistry};

/// Inbound attribute map: wire attribute name → JSON value, in request order
pub type AttributeMap = IndexMap<String, Value>;

/// Inbound entity document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRequest {
    /// Kind model name or type identifier
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: AttributeMap,

    /// Titles of stored mixins to attach, in attachment order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
}

impl EntityRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            attributes: AttributeMap::new(),
            mixins: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn mixin(mut self, title: impl Into<String>) -> Self {
        self.mixins.push(title.into());
        self
    }
}

/// Object-safe builder interface used by the dispatch table
pub trait EntityBuilder: Send {
    fn entity_id(&self) -> &EntityId;

    fn kind(&self) -> &Arc<Kind>;

    /// Read the attributes relevant to this entity type
    fn read_attributes(&mut self, raw: &AttributeMap) -> OcciResult<()>;

    /// Attach mixins in order, failing on the first one that is not allowed
    fn attach_mixins(&mut self, mixins: Vec<Arc<Mixin>>) -> OcciResult<()>;

    fn build_entity(&self) -> OcciResult<OcciEntity>;
}

/// Type-check one attribute against its catalogued declaration
pub(crate) fn read(raw: &AttributeMap, name: &str) -> OcciResult<Option<AttributeValue>> {
    match raw.get(name) {
        Some(value) => attribute(name)?.parse(value),
        None => Ok(None),
    }
}

pub(crate) fn read_string(raw: &AttributeMap, name: &str) -> OcciResult<Option<String>> {
    Ok(read(raw, name)?.map(|value| value.to_string()))
}

/// Non-negative integer that fits the field
pub(crate) fn read_count(raw: &AttributeMap, name: &str) -> OcciResult<Option<u32>> {
    read(raw, name)?
        .and_then(|value| value.as_i64())
        .map(|n| {
            u32::try_from(n).map_err(|_| OcciError::InvalidAttributeValue {
                name: name.to_string(),
                reason: format!("{n} is out of range"),
            })
        })
        .transpose()
}

pub(crate) fn read_float(raw: &AttributeMap, name: &str) -> OcciResult<Option<f64>> {
    Ok(read(raw, name)?.and_then(|value| value.as_f64()))
}

/// String attribute parsed into a domain type
pub(crate) fn read_parsed<T>(raw: &AttributeMap, name: &str) -> OcciResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    read_string(raw, name)?
        .map(|text| {
            text.parse::<T>()
                .map_err(|e| OcciError::InvalidAttributeValue {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

/// Keys the kind does not declare, kept for round-trip fidelity
pub(crate) fn undeclared(raw: &AttributeMap, kind: &Kind) -> AttributeMap {
    raw.iter()
        .filter(|(name, value)| !kind.declares(name) && !value.is_null())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::attributes as names;
    use crate::domain::COMPUTE;
    use serde_json::json;

    fn raw(value: Value) -> AttributeMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_read_count() {
        let map = raw(json!({ names::CORES: "4", names::SHARE: -1 }));
        assert_eq!(read_count(&map, names::CORES).unwrap(), Some(4));
        assert!(matches!(
            read_count(&map, names::SHARE),
            Err(OcciError::InvalidAttributeValue { .. })
        ));
        assert_eq!(read_count(&map, names::MEMORY).unwrap(), None);
    }

    #[test]
    fn test_read_unknown_attribute() {
        let map = raw(json!({ "occi.nowhere": 1 }));
        assert!(matches!(
            read(&map, "occi.nowhere"),
            Err(OcciError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_undeclared_keeps_foreign_keys() {
        let map = raw(json!({
            names::CORES: 2,
            "vendor.flavor": "m1.small",
            "vendor.empty": null
        }));
        let extra = undeclared(&map, &COMPUTE);
        assert_eq!(extra.len(), 1);
        assert_eq!(extra["vendor.flavor"], json!("m1.small"));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: EntityRequest = serde_json::from_value(json!({
            "kind": "occi.infrastructure.compute"
        }))
        .unwrap();
        assert!(request.attributes.is_empty());
        assert!(request.mixins.is_empty());
        assert_eq!(request.id, None);
    }
}
