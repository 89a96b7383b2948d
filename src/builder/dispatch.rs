// Copyright (c) 2025 - Cowboy AI, Inc.
//! Builder Dispatch
//!
//! Maps kind model names to builder constructors. Kinds without an entry
//! fall back to the generic resource builder, keeping their kind when it is
//! a known resource subtype. Strict registries reject them instead.

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{AttributeMap, EntityBuilder, EntityRequest};
use crate::config::EngineConfig;
use crate::domain::identifiers::attributes as names;
use crate::domain::{Kind, Mixin, COMPUTE, KINDS, LINK, RESOURCE};
use crate::entity::{ComputeBuilder, EntityId, LinkBuilder, OcciEntity, ResourceBuilder};
use crate::errors::{OcciError, OcciResult};
use crate::model::Model;

/// Builder constructor for one kind
pub type BuilderFactory = fn(EntityId) -> Box<dyn EntityBuilder>;

fn resource_builder(id: EntityId) -> Box<dyn EntityBuilder> {
    Box::new(ResourceBuilder::with_kind(RESOURCE.clone(), id))
}

fn compute_builder(id: EntityId) -> Box<dyn EntityBuilder> {
    Box::new(ComputeBuilder::with_id(id))
}

fn link_builder(id: EntityId) -> Box<dyn EntityBuilder> {
    Box::new(LinkBuilder::with_id(id))
}

/// Dispatch table from kind model name to builder
#[derive(Debug, Clone)]
pub struct BuilderRegistry {
    factories: IndexMap<String, BuilderFactory>,
    strict: bool,
    id_prefix: String,
}

impl BuilderRegistry {
    /// Empty table; every kind takes the fallback
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
            strict: false,
            id_prefix: EntityId::DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            strict: config.strict_kinds,
            id_prefix: config.id_prefix.clone(),
            ..Self::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn register(&mut self, model: impl Into<String>, factory: BuilderFactory) {
        self.factories.insert(model.into(), factory);
    }

    /// Whether a dedicated builder exists for the kind
    pub fn knows(&self, kind: &str) -> bool {
        self.factories.contains_key(Self::model_name(kind).as_str())
    }

    /// Kind names accept either the model name or the full type identifier
    fn model_name(kind: &str) -> String {
        KINDS
            .resolve(kind)
            .map(|k| k.title().to_string())
            .unwrap_or_else(|| kind.to_string())
    }

    /// Builder for `kind`, with a fresh identifier unless one is given
    pub fn builder_for(&self, kind: &str, id: Option<EntityId>) -> OcciResult<Box<dyn EntityBuilder>> {
        let id = id.unwrap_or_else(|| EntityId::generate(&self.id_prefix));
        let model = Self::model_name(kind);

        if let Some(factory) = self.factories.get(&model) {
            debug!(kind = %model, id = %id, "dispatching to registered builder");
            return Ok(factory(id));
        }

        if self.strict {
            warn!(kind = %kind, "rejecting kind without a registered builder");
            return Err(OcciError::UnknownKind(kind.to_string()));
        }

        let fallback_kind = Self::fallback_kind(kind);
        debug!(
            kind = %kind,
            fallback = %fallback_kind.title(),
            "no builder registered, using generic resource builder"
        );
        Ok(Box::new(ResourceBuilder::with_kind(fallback_kind, id)))
    }

    fn fallback_kind(kind: &str) -> Arc<Kind> {
        KINDS
            .resolve(kind)
            .filter(|k| k.is_subtype_of(&RESOURCE))
            .cloned()
            .unwrap_or_else(|| RESOURCE.clone())
    }

    /// Run the whole pipeline for an inbound document
    pub fn build(&self, request: &EntityRequest, mixins: Vec<Arc<Mixin>>) -> OcciResult<OcciEntity> {
        let mut builder = self.builder_for(&request.kind, request.id.clone().map(EntityId::new))?;
        builder.read_attributes(&request.attributes)?;
        builder.attach_mixins(mixins)?;
        builder.build_entity()
    }

    /// Builder pre-filled from a stored automation model
    ///
    /// Model variables are text; the attribute parsers accept numeric
    /// strings, so they go through the normal read path.
    pub fn from_model(&self, model: &Model) -> OcciResult<Box<dyn EntityBuilder>> {
        let id = model.variable(names::ID).map(EntityId::new);
        let mut builder = self.builder_for(model.service_model(), id)?;
        let raw: AttributeMap = model.to_attribute_map();
        builder.read_attributes(&raw)?;
        Ok(builder)
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(RESOURCE.title(), resource_builder);
        registry.register(COMPUTE.title(), compute_builder);
        registry.register(LINK.title(), link_builder);
        registry
    }
}
