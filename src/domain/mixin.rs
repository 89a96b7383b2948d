// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mixins - Runtime Capability Composition
//!
//! A [`Mixin`] adds attributes to an entity after the fact. It declares the
//! kinds it may apply to and the mixins it depends on; the entity pipeline
//! checks both when attaching it (see [`crate::entity::Entity::attach_mixin`]).
//!
//! Mixins are rebuilt from their persisted [`MixinDefinition`] on every
//! lookup. The link back from a mixin to the entities carrying it is kept as
//! entity identifiers only, in the [`MixinIndex`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::attribute::{attribute, Attribute, AttributeValue};
use super::identifiers::{
    attributes as names, terms, type_identifier, CREDENTIALS_SCHEME, INFRASTRUCTURE_SCHEME,
};
use super::kind::{Kind, COMPUTE, KINDS};
use crate::builder::AttributeMap;
use crate::errors::{OcciError, OcciResult};

/// Mixin identity (scheme + term)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixinId {
    pub scheme: String,
    pub term: String,
}

impl MixinId {
    pub fn new(scheme: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for MixinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_identifier(&self.scheme, &self.term))
    }
}

/// Attachable capability descriptor with its attribute values
#[derive(Debug, Clone, PartialEq)]
pub struct Mixin {
    id: MixinId,
    title: String,
    attributes: IndexMap<String, Attribute>,
    depends: Vec<Arc<Mixin>>,
    applies: Vec<Arc<Kind>>,
    /// Identifiers of the entities carrying this mixin
    entities: Vec<String>,
    values: IndexMap<String, AttributeValue>,
}

impl Mixin {
    pub fn builder(scheme: impl Into<String>, term: impl Into<String>) -> MixinBuilder {
        MixinBuilder::new(scheme, term)
    }

    pub fn id(&self) -> &MixinId {
        &self.id
    }

    pub fn scheme(&self) -> &str {
        &self.id.scheme
    }

    pub fn term(&self) -> &str {
        &self.id.term
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn depends(&self) -> &[Arc<Mixin>] {
        &self.depends
    }

    pub fn applies(&self) -> &[Arc<Kind>] {
        &self.applies
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Attribute values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether the mixin may be attached to an entity of `kind`
    pub fn applies_to(&self, kind: &Kind) -> bool {
        self.applies.iter().any(|target| kind.is_subtype_of(target))
    }
}

/// Builder validating a mixin's attribute values
#[derive(Debug, Clone)]
pub struct MixinBuilder {
    id: MixinId,
    title: Option<String>,
    attributes: IndexMap<String, Attribute>,
    depends: Vec<Arc<Mixin>>,
    applies: Vec<Arc<Kind>>,
    entities: Vec<String>,
    values: IndexMap<String, AttributeValue>,
}

impl MixinBuilder {
    pub fn new(scheme: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: MixinId::new(scheme, term),
            title: None,
            attributes: IndexMap::new(),
            depends: Vec::new(),
            applies: Vec::new(),
            entities: Vec::new(),
            values: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &MixinId {
        &self.id
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes
            .insert(attribute.name().to_string(), attribute);
        self
    }

    pub fn depends(mut self, mixin: Arc<Mixin>) -> Self {
        self.depends.push(mixin);
        self
    }

    pub fn applies(mut self, kind: Arc<Kind>) -> Self {
        if !self.applies.contains(&kind) {
            self.applies.push(kind);
        }
        self
    }

    pub fn entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entities.push(entity_id.into());
        self
    }

    /// Read and type-check the declared attributes from a raw map
    ///
    /// Keys the mixin does not declare are ignored; they belong to the
    /// entity's kind or to other mixins.
    pub fn attributes(mut self, raw: &AttributeMap) -> OcciResult<Self> {
        for attribute in self.attributes.values() {
            match raw.get(attribute.name()) {
                Some(value) => {
                    if let Some(parsed) = attribute.parse(value)? {
                        self.values.insert(attribute.name().to_string(), parsed);
                    } else if attribute.is_required() {
                        return Err(OcciError::MissingAttribute(attribute.name().to_string()));
                    }
                }
                None if attribute.is_required() => {
                    return Err(OcciError::MissingAttribute(attribute.name().to_string()));
                }
                None => {}
            }
        }
        Ok(self)
    }

    pub fn build(&self) -> OcciResult<Mixin> {
        if let Some(missing) = self
            .attributes
            .values()
            .find(|a| a.is_required() && !self.values.contains_key(a.name()))
        {
            return Err(OcciError::MissingAttribute(missing.name().to_string()));
        }

        Ok(Mixin {
            id: self.id.clone(),
            title: self.title.clone().unwrap_or_else(|| self.id.term.clone()),
            attributes: self.attributes.clone(),
            depends: self.depends.clone(),
            applies: self.applies.clone(),
            entities: self.entities.clone(),
            values: self.values.clone(),
        })
    }
}

fn declared(name: &str) -> OcciResult<Attribute> {
    attribute(name).cloned()
}

/// Contextualization: data supplied to a compute once, at creation
pub fn contextualization() -> OcciResult<MixinBuilder> {
    Ok(MixinBuilder::new(INFRASTRUCTURE_SCHEME, terms::CONTEXTUALIZATION)
        .attribute(declared(names::USERDATA)?)
        .applies(COMPUTE.clone()))
}

/// SSH public key injected into a compute
pub fn ssh_key() -> OcciResult<MixinBuilder> {
    Ok(MixinBuilder::new(CREDENTIALS_SCHEME, terms::SSH_KEY)
        .attribute(declared(names::SSH_PUBLIC_KEY)?)
        .applies(COMPUTE.clone()))
}

/// Built-in template for a mixin identity, if the engine ships one
pub fn template(id: &MixinId) -> OcciResult<Option<MixinBuilder>> {
    match (id.scheme.as_str(), id.term.as_str()) {
        (INFRASTRUCTURE_SCHEME, terms::CONTEXTUALIZATION) => contextualization().map(Some),
        (CREDENTIALS_SCHEME, terms::SSH_KEY) => ssh_key().map(Some),
        _ => Ok(None),
    }
}

/// Persisted form of a mixin, as stored by the automation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixinDefinition {
    pub scheme: String,
    pub term: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,

    /// Titles of the mixins this one depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,

    /// Model names of the kinds this mixin applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applies: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: AttributeMap,
}

impl MixinDefinition {
    pub fn id(&self) -> MixinId {
        MixinId::new(&self.scheme, &self.term)
    }

    /// Capture a built mixin for persistence
    pub fn from_mixin(mixin: &Mixin) -> Self {
        Self {
            scheme: mixin.scheme().to_string(),
            term: mixin.term().to_string(),
            title: mixin.title().to_string(),
            attributes: mixin.attributes().cloned().collect(),
            depends: mixin.depends().iter().map(|m| m.title().to_string()).collect(),
            applies: mixin
                .applies()
                .iter()
                .map(|k| k.title().to_string())
                .collect(),
            values: mixin
                .values()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        }
    }

    /// Rebuild the mixin with already-resolved dependencies
    ///
    /// Built-in identities start from their template so the declared
    /// attributes and applicable kinds cannot be overridden by stored data.
    pub fn build(&self, depends: Vec<Arc<Mixin>>, entities: &[String]) -> OcciResult<Mixin> {
        let mut builder = match template(&self.id())? {
            Some(builder) => builder,
            None => {
                let mut builder = MixinBuilder::new(&self.scheme, &self.term);
                for attribute in &self.attributes {
                    builder = builder.attribute(attribute.clone());
                }
                for model in &self.applies {
                    let kind = KINDS.resolve(model).ok_or_else(|| {
                        OcciError::Syntax(format!(
                            "mixin {} applies to unknown kind {model}",
                            self.title
                        ))
                    })?;
                    builder = builder.applies(kind.clone());
                }
                builder
            }
        }
        .title(&self.title);

        for mixin in depends {
            builder = builder.depends(mixin);
        }
        for entity in entities {
            builder = builder.entity(entity.clone());
        }

        builder.attributes(&self.values)?.build()
    }
}

/// Non-owning index between mixins and the entities carrying them
///
/// Mixins are keyed by title, the handle entities and the store use to
/// refer to them. Per-entity lists keep attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixinIndex {
    #[serde(default)]
    by_mixin: IndexMap<String, IndexSet<String>>,
    #[serde(default)]
    by_entity: IndexMap<String, Vec<String>>,
}

impl MixinIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `entity_id` carries `mixin_title`
    pub fn add(&mut self, mixin_title: &str, entity_id: &str) {
        self.by_mixin
            .entry(mixin_title.to_string())
            .or_default()
            .insert(entity_id.to_string());

        let titles = self.by_entity.entry(entity_id.to_string()).or_default();
        if !titles.iter().any(|t| t == mixin_title) {
            titles.push(mixin_title.to_string());
        }
    }

    /// Entities carrying a mixin
    pub fn entities_of(&self, mixin_title: &str) -> Vec<String> {
        self.by_mixin
            .get(mixin_title)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Mixins carried by an entity, in attachment order
    pub fn mixins_of(&self, entity_id: &str) -> Vec<String> {
        self.by_entity.get(entity_id).cloned().unwrap_or_default()
    }

    /// Forget an entity entirely
    pub fn remove_entity(&mut self, entity_id: &str) {
        if let Some(titles) = self.by_entity.shift_remove(entity_id) {
            for title in titles {
                if let Some(ids) = self.by_mixin.get_mut(&title) {
                    ids.shift_remove(entity_id);
                    if ids.is_empty() {
                        self.by_mixin.shift_remove(&title);
                    }
                }
            }
        }
    }

    /// Forget a mixin entirely
    pub fn remove_mixin(&mut self, mixin_title: &str) {
        if let Some(ids) = self.by_mixin.shift_remove(mixin_title) {
            for id in ids {
                if let Some(titles) = self.by_entity.get_mut(&id) {
                    titles.retain(|t| t != mixin_title);
                    if titles.is_empty() {
                        self.by_entity.shift_remove(&id);
                    }
                }
            }
        }
    }

    /// Titles of the mixins at least one entity carries
    pub fn mixin_titles(&self) -> HashSet<&str> {
        self.by_mixin.keys().map(String::as_str).collect()
    }
}
