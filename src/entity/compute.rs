// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute
//!
//! Information processing resource: a virtual machine, container or
//! physical host. All compute attributes are optional; only the ones that
//! are set appear in the rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{Entity, EntityId, OcciEntity, Resource, ResourceBuilder};
use crate::builder::{read_count, read_float, read_parsed, read_string, AttributeMap, EntityBuilder};
use crate::domain::identifiers::attributes as names;
use crate::domain::{Kind, Mixin, COMPUTE};
use crate::errors::{OcciError, OcciResult};
use crate::rendering::EntityRendering;

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "X86",
            Self::X64 => "X64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = OcciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "X86" => Ok(Self::X86),
            "X64" => Ok(Self::X64),
            _ => Err(OcciError::InvalidAttributeValue {
                name: names::ARCHITECTURE.to_string(),
                reason: format!("{s:?} is not X86 or X64"),
            }),
        }
    }
}

/// Lifecycle state of a compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComputeState {
    Active,
    Inactive,
    Suspended,
    Error,
}

impl ComputeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ComputeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeState {
    type Err = OcciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "SUSPENDED" => Ok(Self::Suspended),
            "ERROR" => Ok(Self::Error),
            _ => Err(OcciError::InvalidAttributeValue {
                name: names::STATE.to_string(),
                reason: format!("{s:?} is not a compute state"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compute {
    resource: Resource,
    architecture: Option<Architecture>,
    cores: Option<u32>,
    share: Option<u32>,
    hostname: Option<String>,
    /// Gigabytes
    memory: Option<f64>,
    state: Option<ComputeState>,
    message: Option<String>,
}

impl Compute {
    pub fn builder() -> ComputeBuilder {
        ComputeBuilder::new()
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn entity(&self) -> &Entity {
        self.resource.entity()
    }

    pub fn id(&self) -> &EntityId {
        self.resource.id()
    }

    pub fn title(&self) -> Option<&str> {
        self.resource.title()
    }

    pub fn summary(&self) -> Option<&str> {
        self.resource.summary()
    }

    pub fn mixins(&self) -> &[Arc<Mixin>] {
        self.resource.mixins()
    }

    pub fn architecture(&self) -> Option<Architecture> {
        self.architecture
    }

    pub fn cores(&self) -> Option<u32> {
        self.cores
    }

    pub fn share(&self) -> Option<u32> {
        self.share
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    pub fn state(&self) -> Option<ComputeState> {
        self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Builder seeded with this compute, for updates
    pub fn to_builder(&self) -> ComputeBuilder {
        ComputeBuilder {
            compute: self.clone(),
        }
    }

    pub fn render(&self) -> EntityRendering {
        let mut rendering = self.resource.render_head();
        rendering
            .optional(names::ARCHITECTURE, self.architecture.map(|a| a.as_str()))
            .optional(names::CORES, self.cores)
            .optional(names::SHARE, self.share)
            .optional(names::HOSTNAME, self.hostname.as_deref())
            .optional(names::MEMORY, self.memory)
            .optional(names::STATE, self.state.map(|s| s.as_str()))
            .optional(names::STATE_MESSAGE, self.message.as_deref());
        self.resource.render_tail(&mut rendering);
        rendering.build()
    }

    fn read(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        self.resource.read(raw)?;
        if let Some(architecture) = read_parsed(raw, names::ARCHITECTURE)? {
            self.architecture = Some(architecture);
        }
        if let Some(cores) = read_count(raw, names::CORES)? {
            self.cores = Some(cores);
        }
        if let Some(share) = read_count(raw, names::SHARE)? {
            self.share = Some(share);
        }
        if let Some(hostname) = read_string(raw, names::HOSTNAME)? {
            self.hostname = Some(hostname);
        }
        if let Some(memory) = read_float(raw, names::MEMORY)? {
            if memory < 0.0 {
                return Err(OcciError::InvalidAttributeValue {
                    name: names::MEMORY.to_string(),
                    reason: format!("{memory} is negative"),
                });
            }
            self.memory = Some(memory);
        }
        if let Some(state) = read_parsed(raw, names::STATE)? {
            self.state = Some(state);
        }
        if let Some(message) = read_string(raw, names::STATE_MESSAGE)? {
            self.message = Some(message);
        }
        Ok(())
    }
}

/// Builder for [`Compute`]
#[derive(Debug, Clone)]
pub struct ComputeBuilder {
    compute: Compute,
}

impl ComputeBuilder {
    pub fn new() -> Self {
        Self::with_id(EntityId::generate(EntityId::DEFAULT_PREFIX))
    }

    pub fn with_id(id: EntityId) -> Self {
        Self {
            compute: Compute {
                resource: ResourceBuilder::with_kind(COMPUTE.clone(), id).into_resource(),
                architecture: None,
                cores: None,
                share: None,
                hostname: None,
                memory: None,
                state: None,
                message: None,
            },
        }
    }

    pub fn id(mut self, id: impl Into<EntityId>) -> Self {
        self.compute.resource.entity_mut().set_id(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.compute
            .resource
            .entity_mut()
            .set_title(Some(title.into()));
        self
    }

    pub fn architecture(mut self, architecture: Architecture) -> Self {
        self.compute.architecture = Some(architecture);
        self
    }

    pub fn cores(mut self, cores: u32) -> Self {
        self.compute.cores = Some(cores);
        self
    }

    pub fn share(mut self, share: u32) -> Self {
        self.compute.share = Some(share);
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.compute.hostname = Some(hostname.into());
        self
    }

    pub fn memory(mut self, memory: f64) -> Self {
        self.compute.memory = Some(memory);
        self
    }

    pub fn state(mut self, state: ComputeState) -> Self {
        self.compute.state = Some(state);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.compute.message = Some(message.into());
        self
    }

    pub fn attributes(mut self, raw: &AttributeMap) -> OcciResult<Self> {
        self.compute.read(raw)?;
        Ok(self)
    }

    pub fn add_mixins(mut self, mixins: impl IntoIterator<Item = Arc<Mixin>>) -> OcciResult<Self> {
        for mixin in mixins {
            self.compute.resource.entity_mut().attach_mixin(mixin)?;
        }
        Ok(self)
    }

    pub fn build(&self) -> OcciResult<Compute> {
        Ok(Compute {
            resource: self.compute.resource.finish()?,
            ..self.compute.clone()
        })
    }
}

impl Default for ComputeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityBuilder for ComputeBuilder {
    fn entity_id(&self) -> &EntityId {
        self.compute.id()
    }

    fn kind(&self) -> &Arc<Kind> {
        self.compute.resource.kind()
    }

    fn read_attributes(&mut self, raw: &AttributeMap) -> OcciResult<()> {
        self.compute.read(raw)
    }

    fn attach_mixins(&mut self, mixins: Vec<Arc<Mixin>>) -> OcciResult<()> {
        mixins
            .into_iter()
            .try_for_each(|mixin| self.compute.resource.entity_mut().attach_mixin(mixin))
    }

    fn build_entity(&self) -> OcciResult<OcciEntity> {
        self.build().map(OcciEntity::Compute)
    }
}
