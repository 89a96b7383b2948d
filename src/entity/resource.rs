// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generic resource, also the fallback shape for kinds without a dedicated builder

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use super::{Entity, EntityId, Link, OcciEntity};
use crate::builder::{read_string, undeclared, AttributeMap, EntityBuilder};
use crate::domain::identifiers::attributes as names;
use crate::domain::{AttributeValue, Kind, Mixin, RESOURCE};
use crate::errors::{OcciError, OcciResult};
use crate::rendering::{EntityRendering, RenderingBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    entity: Entity,
    summary: Option<String>,
    links: Vec<Link>,
    /// Typed values of attributes a resource subtype declares beyond the
    /// resource ones, when no dedicated builder handles the subtype
    declared: IndexMap<String, AttributeValue>,
    /// Attributes neither the kind nor an attached mixin declares
    extra: AttributeMap,
}

impl Resource {
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder::new()
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

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn mixins(&self) -> &[Arc<Mixin>] {
        self.entity.mixins()
    }

    pub fn extra_attributes(&self) -> &AttributeMap {
        &self.extra
    }

    /// Subtype attributes read by the generic builder
    pub fn kind_attributes(&self) -> &IndexMap<String, AttributeValue> {
        &self.declared
    }

    pub fn kind_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.declared.get(name)
    }

    pub fn render(&self) -> EntityRendering {
        let mut rendering = self.render_head();
        self.render_tail(&mut rendering);
        rendering.build()
    }

    /// Core and resource attributes, before any subtype fields
    pub(crate) fn render_head(&self) -> RenderingBuilder {
        let mut rendering = self.entity.rendering();
        rendering.optional(names::SUMMARY, self.summary.as_deref());
        rendering
    }

    /// Extras, mixins and links, after any subtype fields
    pub(crate) fn render_tail(&self, rendering: &mut RenderingBuilder) {
        for (name, value) in &self.declared {
            rendering.attribute(name.as_str(), value.to_json());
        }
        for (name, value) in &self.extra {
            rendering.attribute(name.as_str(), value.clone());
        }
        self.entity.render_mixins(rendering);
        for link in &self.links {
            rendering.link(link.id().as_str());
        }
    }

    pub(crate) fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub(crate) fn read(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        self.entity.read_core(raw)?;
        if let Some(summary) = read_string(raw, names::SUMMARY)? {
            self.summary = Some(summary);
        }
        if let Some(links) = raw.get(names::LINKS) {
            self.links = read_links(links)?;
        }
        let extra = undeclared(raw, self.entity.kind());
        self.extra
            .extend(extra.into_iter().filter(|(name, _)| name != names::LINKS));
        Ok(())
    }

    /// Type-check the attributes the kind adds on top of a plain resource
    fn read_kind_attributes(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        let kind = self.entity.kind().clone();
        for attribute in kind.attributes().filter(|a| !RESOURCE.declares(a.name())) {
            if let Some(value) = raw.get(attribute.name()) {
                if let Some(parsed) = attribute.parse(value)? {
                    self.declared.insert(attribute.name().to_string(), parsed);
                }
            }
        }
        Ok(())
    }

    /// Finalize: drop extras now declared by a mixin, check link ownership
    pub(crate) fn finish(&self) -> OcciResult<Resource> {
        let mut resource = self.clone();
        let mixins = resource.entity.mixins().to_vec();
        resource
            .extra
            .retain(|name, _| !mixins.iter().any(|m| m.declares(name)));

        if let Some(link) = resource.links.iter().find(|l| l.source() != resource.id()) {
            return Err(OcciError::InvalidAttributeValue {
                name: names::SOURCE.to_string(),
                reason: format!(
                    "link {} starts at {}, not at resource {}",
                    link.id(),
                    link.source(),
                    resource.id()
                ),
            });
        }
        Ok(resource)
    }
}

/// Links from a JSON array of link renderings, or from its text form as
/// stored in a model variable
fn read_links(value: &Value) -> OcciResult<Vec<Link>> {
    let parsed: Vec<EntityRendering> = match value {
        Value::String(text) => serde_json::from_str(text),
        other => serde_json::from_value(other.clone()),
    }
    .map_err(|e| OcciError::Syntax(format!("{} must be an array of links: {e}", names::LINKS)))?;

    parsed.iter().map(Link::from_rendering).collect()
}

/// Builder for [`Resource`]
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    pub fn new() -> Self {
        Self::with_kind(RESOURCE.clone(), EntityId::generate(EntityId::DEFAULT_PREFIX))
    }

    /// Resource of a specific kind, used for resource subtypes without a
    /// dedicated builder
    pub fn with_kind(kind: Arc<Kind>, id: EntityId) -> Self {
        Self {
            resource: Resource {
                entity: Entity::new(id, kind),
                summary: None,
                links: Vec::new(),
                declared: IndexMap::new(),
                extra: AttributeMap::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<EntityId>) -> Self {
        self.resource.entity.set_id(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.resource.entity.set_title(Some(title.into()));
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.resource.summary = Some(summary.into());
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.resource.links.push(link);
        self
    }

    pub fn attributes(mut self, raw: &AttributeMap) -> OcciResult<Self> {
        self.read_attributes(raw)?;
        Ok(self)
    }

    pub fn add_mixins(mut self, mixins: impl IntoIterator<Item = Arc<Mixin>>) -> OcciResult<Self> {
        for mixin in mixins {
            self.resource.entity.attach_mixin(mixin)?;
        }
        Ok(self)
    }

    pub fn build(&self) -> OcciResult<Resource> {
        self.resource.finish()
    }

    pub(crate) fn into_resource(self) -> Resource {
        self.resource
    }
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityBuilder for ResourceBuilder {
    fn entity_id(&self) -> &EntityId {
        self.resource.id()
    }

    fn kind(&self) -> &Arc<Kind> {
        self.resource.kind()
    }

    fn read_attributes(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        self.resource.read(raw)?;
        self.resource.read_kind_attributes(raw)
    }

    fn attach_mixins(&mut self, mixins: Vec<Arc<Mixin>>) -> OcciResult<()> {
        mixins
            .into_iter()
            .try_for_each(|mixin| self.resource.entity.attach_mixin(mixin))
    }

    fn build_entity(&self) -> OcciResult<OcciEntity> {
        self.build().map(OcciEntity::Resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{COMPONENT, COMPUTE};
    use crate::entity::LinkBuilder;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> AttributeMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resource_attributes() {
        let resource = Resource::builder()
            .attributes(&raw(json!({
                names::ID: "urn:uuid:r1",
                names::TITLE: "storage",
                names::SUMMARY: "backup volume"
            })))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(resource.id().as_str(), "urn:uuid:r1");
        assert_eq!(resource.title(), Some("storage"));
        assert_eq!(resource.summary(), Some("backup volume"));
        assert_eq!(resource.kind(), &*RESOURCE);
    }

    #[test]
    fn test_unknown_keys_survive_as_extras() {
        let resource = Resource::builder()
            .attributes(&raw(json!({
                names::TITLE: "svc",
                "platform.replicas": 3,
                "platform.image": "nginx"
            })))
            .unwrap()
            .build()
            .unwrap();

        let rendering = resource.render();
        assert_eq!(rendering.attribute("platform.replicas"), Some(&json!(3)));
        assert_eq!(rendering.attribute("platform.image"), Some(&json!("nginx")));
        assert_eq!(
            rendering.attributes.keys().collect::<Vec<_>>(),
            vec![names::TITLE, "platform.replicas", "platform.image"]
        );
    }

    #[test]
    fn test_subtype_kind_is_preserved() {
        let resource = ResourceBuilder::with_kind(COMPONENT.clone(), EntityId::new("c1"))
            .build()
            .unwrap();
        assert_eq!(resource.render().kind, "occi.platform.component");
    }

    #[test]
    fn test_subtype_attributes_are_type_checked() {
        let component = ResourceBuilder::with_kind(COMPONENT.clone(), EntityId::new("c1"))
            .attributes(&raw(json!({ names::TITLE: "c", names::COMPONENT_STATE: "inactive" })))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            component.kind_attribute(names::COMPONENT_STATE),
            Some(&AttributeValue::Enum("INACTIVE".into()))
        );
        assert!(component.extra_attributes().is_empty());
        assert_eq!(
            component.render().attribute(names::COMPONENT_STATE),
            Some(&json!("INACTIVE"))
        );

        let invalid = ResourceBuilder::with_kind(COMPONENT.clone(), EntityId::new("c2"))
            .attributes(&raw(json!({ names::COMPONENT_STATE: "bogus" })));
        assert!(matches!(
            invalid,
            Err(OcciError::InvalidAttributeValue { name, .. }) if name == names::COMPONENT_STATE
        ));
    }

    #[test]
    fn test_links_read_from_model_text() {
        let link = LinkBuilder::new()
            .id("l1")
            .source("r1")
            .target("r2")
            .build()
            .unwrap();
        let text = serde_json::to_string(&vec![link.render()]).unwrap();

        let resource = Resource::builder()
            .attributes(&raw(json!({ names::ID: "r1", names::LINKS: text })))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(resource.links(), &[link]);
        assert!(resource.extra_attributes().is_empty());
    }

    #[test]
    fn test_malformed_links_are_a_syntax_error() {
        let result = Resource::builder().attributes(&raw(json!({ names::LINKS: "not json" })));
        assert!(matches!(result, Err(OcciError::Syntax(_))));
    }

    #[test]
    fn test_links_must_start_at_resource() {
        let link = LinkBuilder::new()
            .source("elsewhere")
            .target("r2")
            .build()
            .unwrap();
        let result = Resource::builder().id("r1").link(link).build();
        assert!(matches!(result, Err(OcciError::InvalidAttributeValue { .. })));

        let link = LinkBuilder::new()
            .id("l1")
            .source("r1")
            .target("r2")
            .build()
            .unwrap();
        let resource = Resource::builder().id("r1").link(link).build().unwrap();
        assert_eq!(resource.render().links, vec!["l1".to_string()]);
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = Resource::builder().title("same");
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_compute_mixin_rejected_on_resource() {
        let mixin = Arc::new(
            Mixin::builder("http://example.org/occi#", "gpu")
                .applies(COMPUTE.clone())
                .build()
                .unwrap(),
        );
        let result = Resource::builder().add_mixins([mixin]);
        assert!(matches!(result, Err(OcciError::MixinNotApplicable { .. })));
    }
}
