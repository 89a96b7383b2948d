// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI Metamodel
//!
//! The type system every entity is checked against:
//!
//! - [`Attribute`] - named, typed field declarations and the [`AttributeCatalog`]
//! - [`Kind`] - entity type descriptors with single inheritance
//! - [`Mixin`] - capabilities attached to entities at runtime
//! - [`Action`] - operations invokable on an entity
//!
//! Built-in kinds and attributes are process-wide and read-only; they are
//! created on first access and never change afterwards.

pub mod action;
pub mod attribute;
pub mod identifiers;
pub mod kind;
pub mod mixin;

pub use action::{Action, ComputeAction};
pub use attribute::{Attribute, AttributeCatalog, AttributeType, AttributeValue, CATALOG};
pub use kind::{Kind, KindBuilder, KindRegistry, COMPONENT, COMPUTE, ENTITY, KINDS, LINK, RESOURCE};
pub use mixin::{Mixin, MixinBuilder, MixinDefinition, MixinId, MixinIndex};
