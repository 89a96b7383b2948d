// Copyright (c) 2025 - Cowboy AI, Inc.
//! Transformer Provider
//!
//! A transformer maps a typed entity and an action type onto the flat
//! [`Model`] the cloud automation service consumes:
//!
//! ```text
//! F: (OcciEntity, action) → Model
//! ```
//!
//! Transformers are pure; persisting the model is the caller's job. Each
//! transformer declares the entity shape it expects, and handing it any
//! other shape is a server-side bug reported as [`OcciError::Server`].

pub mod compute;
pub mod resource;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::domain::identifiers::attributes as names;
use crate::entity::{Entity, OcciEntity, Resource};
use crate::errors::{OcciError, OcciResult};
use crate::model::{Model, ModelBuilder};

pub use compute::ComputeTransformer;
pub use resource::{LinkTransformer, ResourceTransformer};

/// Transformer variants, one per entity shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformerType {
    Compute,
    Resource,
    Link,
}

impl fmt::Display for TransformerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compute => write!(f, "compute"),
            Self::Resource => write!(f, "resource"),
            Self::Link => write!(f, "link"),
        }
    }
}

/// Entity → automation model mapping
pub trait Transformer: Send + Sync {
    fn transformer_type(&self) -> TransformerType;

    fn to_model(&self, entity: &OcciEntity, action_type: &str) -> OcciResult<Model>;
}

/// Transformers keyed by variant
pub struct TransformerManager {
    transformers: IndexMap<TransformerType, Box<dyn Transformer>>,
}

impl TransformerManager {
    pub fn empty() -> Self {
        Self {
            transformers: IndexMap::new(),
        }
    }

    pub fn register(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers
            .insert(transformer.transformer_type(), transformer);
    }

    pub fn get(&self, transformer_type: TransformerType) -> OcciResult<&dyn Transformer> {
        self.transformers
            .get(&transformer_type)
            .map(|t| t.as_ref())
            .ok_or_else(|| {
                OcciError::Server(format!("no transformer registered for {transformer_type}"))
            })
    }

    /// Transform with the transformer matching the entity's own shape
    pub fn to_model(&self, entity: &OcciEntity, action_type: &str) -> OcciResult<Model> {
        self.get(entity.transformer_type())?
            .to_model(entity, action_type)
    }
}

impl Default for TransformerManager {
    fn default() -> Self {
        let mut manager = Self::empty();
        manager.register(Box::new(ComputeTransformer));
        manager.register(Box::new(ResourceTransformer));
        manager.register(Box::new(LinkTransformer));
        manager
    }
}

impl fmt::Debug for TransformerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerManager")
            .field("transformers", &self.transformers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Failed cast between the entity handed over and the shape a transformer needs
pub(crate) fn cast_error(expected: TransformerType, entity: &OcciEntity) -> OcciError {
    error!(
        expected = %expected,
        found = %entity.transformer_type(),
        kind = %entity.kind(),
        id = %entity.id(),
        "entity does not match transformer"
    );
    OcciError::Server(format!(
        "{expected} transformer cannot handle {} entity {}",
        entity.transformer_type(),
        entity.id()
    ))
}

/// `occi.core.id` and `occi.core.title`
pub(crate) fn entity_variables(model: ModelBuilder, entity: &Entity) -> ModelBuilder {
    model
        .variable(names::ID, entity.id())
        .optional(names::TITLE, entity.title())
}

/// Summary, subtype attributes, links as JSON text, then the undeclared
/// attributes kept on the resource
pub(crate) fn resource_variables(model: ModelBuilder, resource: &Resource) -> OcciResult<ModelBuilder> {
    let mut model = model.optional(names::SUMMARY, resource.summary());
    for (name, value) in resource.kind_attributes() {
        model = model.variable(name.as_str(), value);
    }
    if !resource.links().is_empty() {
        let links: Vec<_> = resource.links().iter().map(|link| link.render()).collect();
        model = model.variable(names::LINKS, serde_json::to_string(&links)?);
    }
    Ok(resource
        .extra_attributes()
        .iter()
        .fold(model, |model, (name, value)| model.json_variable(name.as_str(), value)))
}

/// Values carried by the attached mixins
pub(crate) fn mixin_variables(model: ModelBuilder, entity: &Entity) -> ModelBuilder {
    entity
        .mixins()
        .iter()
        .flat_map(|mixin| mixin.values())
        .fold(model, |model, (name, value)| model.variable(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Compute, LinkBuilder, Resource};

    #[test]
    fn test_manager_dispatches_on_shape() {
        let manager = TransformerManager::default();

        let compute: OcciEntity = Compute::builder().cores(2).build().unwrap().into();
        let model = manager.to_model(&compute, "create").unwrap();
        assert_eq!(model.service_model(), "occi.infrastructure.compute");
        assert_eq!(model.variable(names::CORES), Some("2"));

        let resource: OcciEntity = Resource::builder().build().unwrap().into();
        let model = manager.to_model(&resource, "create").unwrap();
        assert_eq!(model.service_model(), "occi.core.resource");
    }

    #[test]
    fn test_missing_transformer_is_server_error() {
        let manager = TransformerManager::empty();
        let link: OcciEntity = LinkBuilder::new()
            .source("a")
            .target("b")
            .build()
            .unwrap()
            .into();
        let err = manager.to_model(&link, "create").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
