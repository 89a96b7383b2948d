// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Builder Pipeline
//!
//! Any well-typed compute document builds, renders back to the attributes
//! it was built from, and survives a trip through its automation model.

use indexmap::IndexMap;
use occi_engine::builder::{AttributeMap, BuilderRegistry, EntityRequest};
use occi_engine::domain::identifiers::{attributes as names, models};
use occi_engine::domain::KINDS;
use occi_engine::transformer::TransformerManager;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

fn title_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}(\\.[a-z]{2,6}){0,2}"
}

fn architecture_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("X86"), Just("X64")]
}

fn state_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ACTIVE"),
        Just("INACTIVE"),
        Just("SUSPENDED"),
        Just("ERROR")
    ]
}

/// Declared compute attributes with canonical JSON values
fn compute_attributes() -> impl Strategy<Value = AttributeMap> {
    (
        proptest::option::of(title_strategy()),
        proptest::option::of(architecture_strategy()),
        proptest::option::of(0u32..=1024),
        proptest::option::of(0u32..=100),
        proptest::option::of(hostname_strategy()),
        proptest::option::of(0u32..=4096),
        proptest::option::of(state_strategy()),
    )
        .prop_map(|(title, architecture, cores, share, hostname, memory, state)| {
            let mut map = IndexMap::new();
            let mut put = |name: &str, value: Option<Value>| {
                if let Some(value) = value {
                    map.insert(name.to_string(), value);
                }
            };
            put(names::TITLE, title.map(Value::from));
            put(names::ARCHITECTURE, architecture.map(Value::from));
            put(names::CORES, cores.map(Value::from));
            put(names::SHARE, share.map(Value::from));
            put(names::HOSTNAME, hostname.map(Value::from));
            // Quarter-gigabyte steps keep the float exact in text form
            put(names::MEMORY, memory.map(|m| json!(f64::from(m) / 4.0)));
            put(names::STATE, state.map(Value::from));
            map
        })
}

fn request(attributes: AttributeMap) -> EntityRequest {
    EntityRequest {
        kind: models::COMPUTE.to_string(),
        id: Some("urn:uuid:01934f4a-3000-7000-8000-000000003000".to_string()),
        attributes,
        mixins: Vec::new(),
    }
}

// ============================================================================
// Kind Properties
// ============================================================================

#[test]
fn test_kind_attributes_extend_parent() {
    for kind in KINDS.iter() {
        if let Some(parent) = kind.parent() {
            for attribute in parent.attributes() {
                assert!(
                    kind.declares(attribute.name()),
                    "{} does not inherit {} from {}",
                    kind.title(),
                    attribute.name(),
                    parent.title()
                );
            }
        }
    }
}

#[test]
fn test_kind_lineage_ends_at_entity() {
    for kind in KINDS.iter() {
        let root = kind.lineage().last().expect("lineage includes the kind itself");
        assert_eq!(root.title(), models::ENTITY);
    }
}

// ============================================================================
// Build / Render Properties
// ============================================================================

proptest! {
    /// Property: rendering a built compute yields the attributes it was built from
    #[test]
    fn prop_render_matches_input(attributes in compute_attributes()) {
        let registry = BuilderRegistry::default();
        let entity = registry.build(&request(attributes.clone()), Vec::new()).unwrap();

        prop_assert_eq!(entity.render().attributes, attributes);
    }

    /// Property: building twice from the same builder gives equal entities
    #[test]
    fn prop_build_is_idempotent(attributes in compute_attributes()) {
        let registry = BuilderRegistry::default();
        let mut builder = registry.builder_for(models::COMPUTE, None).unwrap();
        builder.read_attributes(&attributes).unwrap();

        let first = builder.build_entity().unwrap();
        let second = builder.build_entity().unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: an entity read back from its automation model renders the same
    #[test]
    fn prop_model_preserves_rendering(attributes in compute_attributes()) {
        let registry = BuilderRegistry::default();
        let transformers = TransformerManager::default();
        let entity = registry.build(&request(attributes), Vec::new()).unwrap();

        let model = transformers.to_model(&entity, "create").unwrap();
        let restored = registry.from_model(&model).unwrap().build_entity().unwrap();

        prop_assert_eq!(restored.render(), entity.render());
    }

    /// Property: negative core counts never build
    #[test]
    fn prop_negative_cores_rejected(cores in i64::MIN..0) {
        let mut attributes = AttributeMap::new();
        attributes.insert(names::CORES.to_string(), json!(cores));

        let registry = BuilderRegistry::default();
        let result = registry.build(&request(attributes), Vec::new());
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_client_error());
    }
}
