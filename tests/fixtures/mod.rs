// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for occi-engine
//!
//! Deterministic inbound documents, mixin definitions and services.
//! Entity ids are fixed so renderings can be compared structurally.

#![allow(dead_code)]

use serde_json::json;
use std::sync::Arc;

use occi_engine::builder::{AttributeMap, EntityRequest};
use occi_engine::config::EngineConfig;
use occi_engine::domain::identifiers::{
    attributes as names, models, terms, CREDENTIALS_SCHEME, INFRASTRUCTURE_SCHEME,
};
use occi_engine::domain::{Attribute, MixinDefinition};
use occi_engine::service::InstanceService;
use occi_engine::store::InMemoryStore;

pub const VM_ID: &str = "urn:uuid:01934f4a-1000-7000-8000-000000001000";
pub const RESOURCE_ID: &str = "urn:uuid:01934f4a-2000-7000-8000-000000002000";

pub const CTX_TITLE: &str = "ctx-vm1";
pub const KEY_TITLE: &str = "alice-key";
pub const LOGIN_TITLE: &str = "login";

/// Attribute map from a JSON object literal
pub fn attributes(value: serde_json::Value) -> AttributeMap {
    serde_json::from_value(value).expect("fixture attribute map must be a JSON object")
}

/// The canonical compute example: vm1, 2 cores, X64
pub fn vm1_request() -> EntityRequest {
    EntityRequest {
        kind: models::COMPUTE.to_string(),
        id: Some(VM_ID.to_string()),
        attributes: attributes(json!({
            names::TITLE: "vm1",
            names::CORES: "2",
            names::ARCHITECTURE: "X64"
        })),
        mixins: Vec::new(),
    }
}

pub fn contextualization_definition() -> MixinDefinition {
    MixinDefinition {
        scheme: INFRASTRUCTURE_SCHEME.to_string(),
        term: terms::CONTEXTUALIZATION.to_string(),
        title: CTX_TITLE.to_string(),
        attributes: Vec::new(),
        depends: Vec::new(),
        applies: Vec::new(),
        values: attributes(json!({ names::USERDATA: "userDataTest" })),
    }
}

pub fn ssh_key_definition() -> MixinDefinition {
    MixinDefinition {
        scheme: CREDENTIALS_SCHEME.to_string(),
        term: terms::SSH_KEY.to_string(),
        title: KEY_TITLE.to_string(),
        attributes: Vec::new(),
        depends: Vec::new(),
        applies: Vec::new(),
        values: attributes(json!({ names::SSH_PUBLIC_KEY: "ssh-ed25519 AAAAC3Nza alice" })),
    }
}

/// User-defined mixin depending on the ssh key
pub fn login_definition() -> MixinDefinition {
    MixinDefinition {
        scheme: "http://example.org/occi/extensions#".to_string(),
        term: "login".to_string(),
        title: LOGIN_TITLE.to_string(),
        attributes: vec![Attribute::string("example.login.user").required()],
        depends: vec![KEY_TITLE.to_string()],
        applies: vec![models::COMPUTE.to_string()],
        values: attributes(json!({ "example.login.user": "alice" })),
    }
}

pub fn service() -> InstanceService {
    InstanceService::new(Arc::new(InMemoryStore::new()), &EngineConfig::default())
}

/// Service with the three fixture mixins stored
pub fn service_with_mixins() -> InstanceService {
    let service = service();
    for definition in [
        contextualization_definition(),
        ssh_key_definition(),
        login_definition(),
    ] {
        service
            .mixins()
            .add_mixin(&definition)
            .expect("fixture mixin definitions must be valid");
    }
    service
}
