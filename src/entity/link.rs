// Copyright (c) 2025 - Cowboy AI, Inc.
//! Link between two resources

use std::sync::Arc;

use super::{Entity, EntityId, OcciEntity};
use crate::builder::{read_string, undeclared, AttributeMap, EntityBuilder};
use crate::domain::identifiers::attributes as names;
use crate::domain::{Kind, Mixin, LINK};
use crate::errors::{OcciError, OcciResult};
use crate::rendering::EntityRendering;

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    entity: Entity,
    source: EntityId,
    target: EntityId,
    extra: AttributeMap,
}

impl Link {
    pub fn builder() -> LinkBuilder {
        LinkBuilder::new()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn id(&self) -> &EntityId {
        self.entity.id()
    }

    pub fn kind(&self) -> &Arc<Kind> {
        self.entity.kind()
    }

    pub fn title(&self) -> Option<&str> {
        self.entity.title()
    }

    pub fn source(&self) -> &EntityId {
        &self.source
    }

    pub fn target(&self) -> &EntityId {
        &self.target
    }

    pub fn extra_attributes(&self) -> &AttributeMap {
        &self.extra
    }

    /// Rebuild a link from its rendering. Mixin titles are not resolved.
    pub(crate) fn from_rendering(rendering: &EntityRendering) -> OcciResult<Link> {
        LinkBuilder::with_id(EntityId::new(rendering.id.as_str()))
            .attributes(&rendering.to_attribute_map())?
            .build()
    }

    pub fn render(&self) -> EntityRendering {
        let mut rendering = self.entity.rendering();
        rendering
            .attribute(names::SOURCE, self.source.as_str())
            .attribute(names::TARGET, self.target.as_str());
        for (name, value) in &self.extra {
            rendering.attribute(name.as_str(), value.clone());
        }
        self.entity.render_mixins(&mut rendering);
        rendering.build()
    }
}

/// Builder for [`Link`]; source and target are required
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    entity: Entity,
    source: Option<EntityId>,
    target: Option<EntityId>,
    extra: AttributeMap,
}

impl LinkBuilder {
    pub fn new() -> Self {
        Self::with_id(EntityId::generate(EntityId::DEFAULT_PREFIX))
    }

    pub fn with_id(id: EntityId) -> Self {
        Self {
            entity: Entity::new(id, LINK.clone()),
            source: None,
            target: None,
            extra: AttributeMap::new(),
        }
    }

    pub fn id(mut self, id: impl Into<EntityId>) -> Self {
        self.entity.set_id(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.entity.set_title(Some(title.into()));
        self
    }

    pub fn source(mut self, source: impl Into<EntityId>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn target(mut self, target: impl Into<EntityId>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn attributes(mut self, raw: &AttributeMap) -> OcciResult<Self> {
        self.read_attributes(raw)?;
        Ok(self)
    }

    pub fn add_mixins(mut self, mixins: impl IntoIterator<Item = Arc<Mixin>>) -> OcciResult<Self> {
        for mixin in mixins {
            self.entity.attach_mixin(mixin)?;
        }
        Ok(self)
    }

    pub fn build(&self) -> OcciResult<Link> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| OcciError::MissingAttribute(names::SOURCE.to_string()))?;
        let target = self
            .target
            .clone()
            .ok_or_else(|| OcciError::MissingAttribute(names::TARGET.to_string()))?;

        let mixins = self.entity.mixins();
        let mut extra = self.extra.clone();
        extra.retain(|name, _| !mixins.iter().any(|m| m.declares(name)));

        Ok(Link {
            entity: self.entity.clone(),
            source,
            target,
            extra,
        })
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityBuilder for LinkBuilder {
    fn entity_id(&self) -> &EntityId {
        self.entity.id()
    }

    fn kind(&self) -> &Arc<Kind> {
        self.entity.kind()
    }

    fn read_attributes(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        self.entity.read_core(raw)?;
        if let Some(source) = read_string(raw, names::SOURCE)? {
            self.source = Some(EntityId::new(source));
        }
        if let Some(target) = read_string(raw, names::TARGET)? {
            self.target = Some(EntityId::new(target));
        }
        let extra = undeclared(raw, self.entity.kind());
        self.extra.extend(extra);
        Ok(())
    }

    fn attach_mixins(&mut self, mixins: Vec<Arc<Mixin>>) -> OcciResult<()> {
        mixins
            .into_iter()
            .try_for_each(|mixin| self.entity.attach_mixin(mixin))
    }

    fn build_entity(&self) -> OcciResult<OcciEntity> {
        self.build().map(OcciEntity::Link)
    }
}
