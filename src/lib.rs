// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI metamodel and transformation engine
//!
//! Validates untyped OCCI attribute maps against a type system of kinds,
//! mixins and attributes, builds typed entities from them, renders entities
//! back to the wire shape and maps them onto the flat models a cloud
//! automation backend stores.
//!
//! ```text
//! attribute map → BuilderRegistry → OcciEntity → render() → rendering
//!                                       ↓
//!                              Transformer → Model → VariableStore
//! ```

pub mod builder;
pub mod config;
pub mod domain;
pub mod entity;
pub mod errors;
pub mod model;
pub mod rendering;
pub mod service;
pub mod state_machine;
pub mod store;
pub mod transformer;

// Re-export commonly used types
pub use builder::{AttributeMap, BuilderRegistry, EntityBuilder, EntityRequest};
pub use config::EngineConfig;
pub use domain::{Attribute, AttributeType, ComputeAction, Kind, Mixin, MixinDefinition};
pub use entity::{Compute, EntityId, Link, OcciEntity, Resource};
pub use errors::{OcciError, OcciResult};
pub use model::Model;
pub use rendering::EntityRendering;
pub use service::{InstanceService, MixinService};
pub use store::{InMemoryStore, StoreError, VariableStore};
pub use transformer::{Transformer, TransformerManager, TransformerType};
