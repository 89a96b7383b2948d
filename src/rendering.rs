// Copyright (c) 2025 - Cowboy AI, Inc.
//! Entity Renderings
//!
//! The outbound JSON form of an entity: kind model name, id, the attributes
//! that are actually set (typed JSON values), attached mixin titles and
//! link ids. Renderings are plain data; building one never fails.
//!
//! Enumerated values render in the case they were declared with, whatever
//! case the inbound document used: `x64` comes back as `"X64"`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serializable entity snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRendering {
    pub kind: String,
    pub id: String,

    #[serde(default)]
    pub attributes: IndexMap<String, Value>,

    /// Mixin titles in attachment order
    #[serde(default)]
    pub mixins: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl EntityRendering {
    pub fn builder(kind: impl Into<String>, id: impl Into<String>) -> RenderingBuilder {
        RenderingBuilder {
            rendering: EntityRendering {
                kind: kind.into(),
                id: id.into(),
                attributes: IndexMap::new(),
                mixins: Vec::new(),
                links: Vec::new(),
            },
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Attributes as an inbound map, for feeding a rendering back to a builder
    pub fn to_attribute_map(&self) -> crate::builder::AttributeMap {
        self.attributes.clone()
    }
}

/// Accumulates a rendering; fields are only added when set
#[derive(Debug, Clone)]
pub struct RenderingBuilder {
    rendering: EntityRendering,
}

impl RenderingBuilder {
    pub fn attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.rendering.attributes.insert(name.into(), value.into());
        self
    }

    /// Add the attribute only when a value is present
    pub fn optional<V: Into<Value>>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.attribute(name, value);
        }
        self
    }

    pub fn mixin(&mut self, title: impl Into<String>) -> &mut Self {
        self.rendering.mixins.push(title.into());
        self
    }

    pub fn link(&mut self, id: impl Into<String>) -> &mut Self {
        self.rendering.links.push(id.into());
        self
    }

    pub fn build(self) -> EntityRendering {
        self.rendering
    }
}
