// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer
//!
//! Orchestrates the builder pipeline, the transformers and the variable
//! store.
//!
//! ```text
//! Client Request
//!     ↓
//! InstanceService ──→ MixinService (definitions, mixin index)
//!     ↓
//! BuilderRegistry → OcciEntity
//!     ↓
//! TransformerManager → Model
//!     ↓
//! VariableStore (cloud automation service)
//! ```
//!
//! Services are synchronous; every store call is a blocking request that
//! may fail with [`crate::store::StoreError`], surfaced as
//! [`crate::errors::OcciError::Store`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use occi_engine::builder::EntityRequest;
//! use occi_engine::config::EngineConfig;
//! use occi_engine::service::InstanceService;
//! use occi_engine::store::InMemoryStore;
//! use occi_engine::transformer::TransformerType;
//!
//! let service = InstanceService::new(Arc::new(InMemoryStore::new()), &EngineConfig::default());
//! let request = EntityRequest::new("occi.infrastructure.compute")
//!     .attribute("occi.core.title", "vm1")
//!     .attribute("occi.compute.cores", 2);
//!
//! let entity = service.build_entity(&request)?;
//! let stored = service.create(&entity, TransformerType::Compute)?;
//! assert_eq!(stored.render().attribute("occi.compute.cores"), Some(&serde_json::json!(2)));
//! # Ok::<(), occi_engine::errors::OcciError>(())
//! ```

pub mod instance;
pub mod mixin;

pub use instance::{InstanceService, INSTANCE_PREFIX};
pub use mixin::{MixinService, MIXIN_INDEX_KEY, MIXIN_PREFIX};
