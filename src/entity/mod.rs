// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI Entity Model
//!
//! Typed, in-memory OCCI instances. Every instance shares the [`Entity`]
//! core (identity, kind, title, attached mixins); the concrete shapes are a
//! closed set of variants in [`OcciEntity`]:
//!
//! - [`Resource`] - generic resource, also the fallback for unknown kinds
//! - [`Compute`] - information processing resource
//! - [`Link`] - relation between two resources
//!
//! Entities are produced by their builders and are immutable afterwards.

pub mod compute;
pub mod link;
pub mod resource;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::builder::{read_string, AttributeMap};
use crate::domain::identifiers::attributes as names;
use crate::domain::{AttributeValue, Kind, Mixin, MixinId};
use crate::errors::{OcciError, OcciResult};
use crate::rendering::{EntityRendering, RenderingBuilder};
use crate::transformer::TransformerType;

pub use compute::{Architecture, Compute, ComputeBuilder, ComputeState};
pub use link::{Link, LinkBuilder};
pub use resource::{Resource, ResourceBuilder};

/// URL-like entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub const DEFAULT_PREFIX: &'static str = "urn:uuid:";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier under `prefix`
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}{}", Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// State shared by every OCCI instance
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: Arc<Kind>,
    title: Option<String>,
    mixins: Vec<Arc<Mixin>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: Arc<Kind>) -> Self {
        Self {
            id,
            kind,
            title: None,
            mixins: Vec::new(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> &Arc<Kind> {
        &self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Attached mixins, in attachment order
    pub fn mixins(&self) -> &[Arc<Mixin>] {
        &self.mixins
    }

    pub fn has_mixin(&self, id: &MixinId) -> bool {
        self.mixins.iter().any(|m| m.id() == id)
    }

    /// Whether the kind or an attached mixin declares `name`
    pub fn declares(&self, name: &str) -> bool {
        self.kind.declares(name) || self.mixins.iter().any(|m| m.declares(name))
    }

    /// Value carried by an attached mixin
    pub fn mixin_value(&self, name: &str) -> Option<&AttributeValue> {
        self.mixins.iter().find_map(|m| m.value(name))
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Read `occi.core.id` and `occi.core.title`
    pub(crate) fn read_core(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        if let Some(id) = read_string(raw, names::ID)? {
            self.id = EntityId::new(id);
        }
        if let Some(title) = read_string(raw, names::TITLE)? {
            self.title = Some(title);
        }
        Ok(())
    }

    /// Attach a mixin after checking it applies, is new and has its
    /// dependencies in place
    pub(crate) fn attach_mixin(&mut self, mixin: Arc<Mixin>) -> OcciResult<()> {
        if !mixin.applies_to(&self.kind) {
            return Err(OcciError::MixinNotApplicable {
                mixin: mixin.id().to_string(),
                kind: self.kind.type_identifier(),
            });
        }
        if self.has_mixin(mixin.id()) {
            return Err(OcciError::DuplicateMixin(mixin.id().to_string()));
        }
        if let Some(missing) = mixin.depends().iter().find(|dep| !self.has_mixin(dep.id())) {
            return Err(OcciError::MissingDependency {
                mixin: mixin.id().to_string(),
                dependency: missing.id().to_string(),
            });
        }

        debug!(entity = %self.id, mixin = %mixin.id(), "attached mixin");
        self.mixins.push(mixin);
        Ok(())
    }

    pub(crate) fn rendering(&self) -> RenderingBuilder {
        let mut rendering = EntityRendering::builder(self.kind.title(), self.id.as_str());
        if let Some(title) = &self.title {
            rendering.attribute(names::TITLE, title.as_str());
        }
        rendering
    }

    pub(crate) fn render_mixins(&self, rendering: &mut RenderingBuilder) {
        for mixin in &self.mixins {
            rendering.mixin(mixin.title());
        }
    }
}

/// Closed set of entity shapes
#[derive(Debug, Clone, PartialEq)]
pub enum OcciEntity {
    Resource(Resource),
    Compute(Compute),
    Link(Link),
}

impl OcciEntity {
    pub fn entity(&self) -> &Entity {
        match self {
            Self::Resource(resource) => resource.entity(),
            Self::Compute(compute) => compute.entity(),
            Self::Link(link) => link.entity(),
        }
    }

    pub fn id(&self) -> &EntityId {
        self.entity().id()
    }

    pub fn kind(&self) -> &Arc<Kind> {
        self.entity().kind()
    }

    pub fn title(&self) -> Option<&str> {
        self.entity().title()
    }

    pub fn mixins(&self) -> &[Arc<Mixin>] {
        self.entity().mixins()
    }

    /// Resource view; a compute is a resource
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::Compute(compute) => Some(compute.resource()),
            Self::Link(_) => None,
        }
    }

    pub fn as_compute(&self) -> Option<&Compute> {
        match self {
            Self::Compute(compute) => Some(compute),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Transformer variant matching this shape
    pub fn transformer_type(&self) -> TransformerType {
        match self {
            Self::Resource(_) => TransformerType::Resource,
            Self::Compute(_) => TransformerType::Compute,
            Self::Link(_) => TransformerType::Link,
        }
    }

    pub fn render(&self) -> EntityRendering {
        match self {
            Self::Resource(resource) => resource.render(),
            Self::Compute(compute) => compute.render(),
            Self::Link(link) => link.render(),
        }
    }
}

impl From<Resource> for OcciEntity {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<Compute> for OcciEntity {
    fn from(compute: Compute) -> Self {
        Self::Compute(compute)
    }
}

impl From<Link> for OcciEntity {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}
