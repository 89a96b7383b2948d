// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource and link transformers

use super::{cast_error, entity_variables, mixin_variables, resource_variables};
use super::{Transformer, TransformerType};
use crate::domain::identifiers::attributes as names;
use crate::entity::OcciEntity;
use crate::errors::OcciResult;
use crate::model::Model;

/// Generic resource transformer
///
/// Accepts any resource, compute included, but only flattens the resource
/// level attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceTransformer;

impl Transformer for ResourceTransformer {
    fn transformer_type(&self) -> TransformerType {
        TransformerType::Resource
    }

    fn to_model(&self, entity: &OcciEntity, action_type: &str) -> OcciResult<Model> {
        let resource = entity
            .as_resource()
            .ok_or_else(|| cast_error(self.transformer_type(), entity))?;

        let model = Model::builder(resource.kind().title(), action_type);
        let model = resource_variables(entity_variables(model, resource.entity()), resource)?;
        Ok(mixin_variables(model, resource.entity()).build())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTransformer;

impl Transformer for LinkTransformer {
    fn transformer_type(&self) -> TransformerType {
        TransformerType::Link
    }

    fn to_model(&self, entity: &OcciEntity, action_type: &str) -> OcciResult<Model> {
        let link = entity
            .as_link()
            .ok_or_else(|| cast_error(self.transformer_type(), entity))?;

        let model = Model::builder(link.kind().title(), action_type);
        let model = link
            .extra_attributes()
            .iter()
            .fold(
                entity_variables(model, link.entity())
                    .variable(names::SOURCE, link.source())
                    .variable(names::TARGET, link.target()),
                |model, (name, value)| model.json_variable(name.as_str(), value),
            );
        Ok(mixin_variables(model, link.entity()).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AttributeMap;
    use crate::domain::COMPONENT;
    use crate::entity::{Compute, EntityId, LinkBuilder, Resource, ResourceBuilder};
    use crate::errors::OcciError;
    use serde_json::json;

    #[test]
    fn test_extras_are_flattened_as_text() {
        let raw: AttributeMap = serde_json::from_value(json!({
            names::SUMMARY: "web tier",
            "platform.replicas": 3
        }))
        .unwrap();
        let resource: OcciEntity = Resource::builder()
            .attributes(&raw)
            .unwrap()
            .build()
            .unwrap()
            .into();

        let model = ResourceTransformer.to_model(&resource, "update").unwrap();
        assert_eq!(model.variable(names::SUMMARY), Some("web tier"));
        assert_eq!(model.variable("platform.replicas"), Some("3"));
    }

    #[test]
    fn test_subtype_attributes_and_links_are_flattened() {
        let raw: AttributeMap =
            serde_json::from_value(json!({ names::COMPONENT_STATE: "active" })).unwrap();
        let link = LinkBuilder::new()
            .id("l1")
            .source("c1")
            .target("c2")
            .build()
            .unwrap();
        let component: OcciEntity =
            ResourceBuilder::with_kind(COMPONENT.clone(), EntityId::new("c1"))
                .attributes(&raw)
                .unwrap()
                .link(link)
                .build()
                .unwrap()
                .into();

        let model = ResourceTransformer.to_model(&component, "create").unwrap();
        assert_eq!(model.service_model(), "occi.platform.component");
        assert_eq!(model.variable(names::COMPONENT_STATE), Some("ACTIVE"));

        let links: serde_json::Value =
            serde_json::from_str(model.variable(names::LINKS).unwrap()).unwrap();
        assert_eq!(links[0]["id"], json!("l1"));
        assert_eq!(links[0]["attributes"][names::TARGET], json!("c2"));
    }

    #[test]
    fn test_compute_is_a_resource() {
        let compute: OcciEntity = Compute::builder().cores(4).build().unwrap().into();
        let model = ResourceTransformer.to_model(&compute, "create").unwrap();
        assert_eq!(model.service_model(), "occi.infrastructure.compute");
        assert_eq!(model.variable(names::CORES), None);
    }

    #[test]
    fn test_link_variables() {
        let link: OcciEntity = LinkBuilder::new()
            .source("urn:uuid:vm1")
            .target("urn:uuid:net1")
            .build()
            .unwrap()
            .into();

        let model = LinkTransformer.to_model(&link, "create").unwrap();
        assert_eq!(model.variable(names::SOURCE), Some("urn:uuid:vm1"));
        assert!(matches!(
            ResourceTransformer.to_model(&link, "create"),
            Err(OcciError::Server(_))
        ));
    }
}
