// Copyright (c) 2025 - Cowboy AI, Inc.
//! Automation Model
//!
//! The flat shape the cloud automation service stores per instance: a
//! service model name (the kind's model name), an action type and a map of
//! string variables keyed by attribute name.
//!
//! ```json
//! {
//!   "model": "occi.infrastructure.compute",
//!   "action": "create",
//!   "variables": { "occi.core.id": "urn:uuid:…", "occi.compute.cores": "2" }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

use crate::builder::AttributeMap;
use crate::errors::{OcciError, OcciResult};

/// Automation-ready description of one entity and one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "model")]
    service_model: String,

    #[serde(rename = "action", default)]
    action_type: String,

    #[serde(default)]
    variables: IndexMap<String, String>,
}

impl Model {
    pub fn builder(service_model: impl Into<String>, action_type: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            model: Model {
                service_model: service_model.into(),
                action_type: action_type.into(),
                variables: IndexMap::new(),
            },
        }
    }

    pub fn service_model(&self) -> &str {
        &self.service_model
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Same model under a different action
    pub fn with_action(&self, action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..self.clone()
        }
    }

    /// Variables as an inbound attribute map
    pub fn to_attribute_map(&self) -> AttributeMap {
        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect()
    }

    pub fn to_json(&self) -> OcciResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> OcciResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OcciError::Syntax(format!("malformed automation model: {e}")))
    }
}

/// Builder for [`Model`]
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn variable(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.model.variables.insert(name.into(), value.to_string());
        self
    }

    /// Add the variable only when a value is present
    pub fn optional<V: Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.variable(name, value),
            None => self,
        }
    }

    /// Untyped value, strings unquoted
    pub fn json_variable(self, name: impl Into<String>, value: &Value) -> Self {
        match value {
            Value::String(s) => self.variable(name, s),
            other => self.variable(name, other),
        }
    }

    pub fn build(self) -> Model {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let model = Model::builder("occi.infrastructure.compute", "create")
            .variable("occi.core.id", "urn:uuid:1")
            .optional("occi.compute.cores", Some(2))
            .optional::<f64>("occi.compute.memory", None)
            .json_variable("vendor.flavor", &json!("m1.small"))
            .json_variable("vendor.count", &json!(3))
            .build();

        assert_eq!(
            serde_json::from_str::<Value>(&model.to_json().unwrap()).unwrap(),
            json!({
                "model": "occi.infrastructure.compute",
                "action": "create",
                "variables": {
                    "occi.core.id": "urn:uuid:1",
                    "occi.compute.cores": "2",
                    "vendor.flavor": "m1.small",
                    "vendor.count": "3"
                }
            })
        );
    }

    #[test]
    fn test_from_json() {
        let model = Model::from_json(r#"{"model":"occi.core.resource","variables":{"a":"b"}}"#).unwrap();
        assert_eq!(model.service_model(), "occi.core.resource");
        assert_eq!(model.action_type(), "");
        assert_eq!(model.variable("a"), Some("b"));
        assert_eq!(model.to_attribute_map()["a"], json!("b"));

        assert!(matches!(Model::from_json("{}"), Err(OcciError::Syntax(_))));
    }

    #[test]
    fn test_with_action() {
        let model = Model::builder("occi.core.resource", "create").build();
        assert_eq!(model.with_action("delete").action_type(), "delete");
    }
}
