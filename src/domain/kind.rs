// Copyright (c) 2025 - Cowboy AI, Inc.
//! Kind Hierarchy
//!
//! A [`Kind`] is the type descriptor of an entity: scheme+term identity, a
//! title, an optional parent and an attribute set. The effective attribute
//! set of a kind is its own declarations plus everything inherited from its
//! ancestors, resolved once by [`KindBuilder::build`].
//!
//! # Built-in hierarchy
//!
//! ```text
//! entity ─┬─ resource ─┬─ compute
//!         │            └─ component
//!         └─ link
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::attribute::{attribute, Attribute};
use super::identifiers::{
    attributes as names, models, terms, type_identifier, CORE_SCHEME, INFRASTRUCTURE_SCHEME,
    PLATFORM_SCHEME,
};
use crate::errors::{OcciError, OcciResult};

/// Entity type descriptor with an inheritable attribute schema
#[derive(Debug, Clone)]
pub struct Kind {
    scheme: String,
    term: String,
    title: String,
    parent: Option<Arc<Kind>>,
    /// Effective attribute set: inherited declarations first, then own
    attributes: IndexMap<String, Attribute>,
}

impl Kind {
    pub fn builder(scheme: impl Into<String>, term: impl Into<String>) -> KindBuilder {
        KindBuilder::new(scheme, term)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Title, also the model name reported on the wire
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<&Arc<Kind>> {
        self.parent.as_ref()
    }

    /// OCCI type identifier (scheme followed by term)
    pub fn type_identifier(&self) -> String {
        type_identifier(&self.scheme, &self.term)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|a| a.is_required())
    }

    /// This kind followed by its parent chain up to the root
    pub fn lineage(&self) -> impl Iterator<Item = &Kind> {
        std::iter::successors(Some(self), |kind| kind.parent.as_deref())
    }

    /// Whether `other` is this kind or one of its ancestors
    pub fn is_subtype_of(&self, other: &Kind) -> bool {
        self.lineage().any(|kind| kind == other)
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.term == other.term
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.term.hash(state);
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.scheme, self.term)
    }
}

/// Builder resolving a kind's inherited attribute set
#[derive(Debug, Clone)]
pub struct KindBuilder {
    scheme: String,
    term: String,
    title: Option<String>,
    parent: Option<Arc<Kind>>,
    attributes: Vec<Attribute>,
}

impl KindBuilder {
    pub fn new(scheme: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            term: term.into(),
            title: None,
            parent: None,
            attributes: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn parent(mut self, parent: Arc<Kind>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Resolve the effective attribute set and freeze the kind
    ///
    /// The parent already carries its ancestors' attributes, so one merge
    /// covers the whole chain. Redeclaring an inherited attribute with the
    /// same type is tolerated; a different type is a conflict.
    pub fn build(self) -> OcciResult<Kind> {
        let mut resolved: IndexMap<String, Attribute> = self
            .parent
            .as_ref()
            .map(|parent| parent.attributes.clone())
            .unwrap_or_default();

        for attribute in self.attributes {
            match resolved.get(attribute.name()) {
                Some(existing) if existing.value_type() != attribute.value_type() => {
                    return Err(OcciError::AttributeConflict {
                        kind: type_identifier(&self.scheme, &self.term),
                        name: attribute.name().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    resolved.insert(attribute.name().to_string(), attribute);
                }
            }
        }

        Ok(Kind {
            title: self.title.unwrap_or_else(|| self.term.clone()),
            scheme: self.scheme,
            term: self.term,
            parent: self.parent,
            attributes: resolved,
        })
    }
}

/// Kinds addressable by model name
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: IndexMap<String, Arc<Kind>>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: Arc<Kind>) {
        self.kinds.insert(kind.title().to_string(), kind);
    }

    /// Find a kind by model name (its title)
    pub fn by_model(&self, model: &str) -> Option<&Arc<Kind>> {
        self.kinds.get(model)
    }

    /// Find a kind by scheme and term
    pub fn by_identity(&self, scheme: &str, term: &str) -> Option<&Arc<Kind>> {
        self.kinds
            .values()
            .find(|kind| kind.scheme() == scheme && kind.term() == term)
    }

    /// Find a kind by model name or by full type identifier
    pub fn resolve(&self, name: &str) -> Option<&Arc<Kind>> {
        self.by_model(name).or_else(|| {
            self.kinds
                .values()
                .find(|kind| kind.type_identifier() == name)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Kind>> {
        self.kinds.values()
    }
}

fn builtin(builder: KindBuilder) -> Arc<Kind> {
    Arc::new(
        builder
            .build()
            .expect("built-in kind declarations must be consistent"),
    )
}

fn declared(name: &str) -> Attribute {
    attribute(name)
        .cloned()
        .expect("built-in kinds only reference catalogued attributes")
}

/// Root of the hierarchy
pub static ENTITY: Lazy<Arc<Kind>> = Lazy::new(|| {
    builtin(
        Kind::builder(CORE_SCHEME, terms::ENTITY)
            .title(models::ENTITY)
            .attribute(declared(names::ID))
            .attribute(declared(names::TITLE)),
    )
});

pub static RESOURCE: Lazy<Arc<Kind>> = Lazy::new(|| {
    builtin(
        Kind::builder(CORE_SCHEME, terms::RESOURCE)
            .title(models::RESOURCE)
            .parent(ENTITY.clone())
            .attribute(declared(names::SUMMARY)),
    )
});

pub static LINK: Lazy<Arc<Kind>> = Lazy::new(|| {
    builtin(
        Kind::builder(CORE_SCHEME, terms::LINK)
            .title(models::LINK)
            .parent(ENTITY.clone())
            .attribute(declared(names::SOURCE))
            .attribute(declared(names::TARGET)),
    )
});

pub static COMPUTE: Lazy<Arc<Kind>> = Lazy::new(|| {
    builtin(
        Kind::builder(INFRASTRUCTURE_SCHEME, terms::COMPUTE)
            .title(models::COMPUTE)
            .parent(RESOURCE.clone())
            .attributes(
                [
                    names::ARCHITECTURE,
                    names::CORES,
                    names::SHARE,
                    names::HOSTNAME,
                    names::MEMORY,
                    names::STATE,
                    names::STATE_MESSAGE,
                ]
                .into_iter()
                .map(declared),
            ),
    )
});

/// Platform component, parent of platform extension kinds
pub static COMPONENT: Lazy<Arc<Kind>> = Lazy::new(|| {
    builtin(
        Kind::builder(PLATFORM_SCHEME, terms::COMPONENT)
            .title(models::COMPONENT)
            .parent(RESOURCE.clone())
            .attribute(declared(names::COMPONENT_STATE)),
    )
});

/// Built-in kinds by model name
pub static KINDS: Lazy<KindRegistry> = Lazy::new(|| {
    let mut registry = KindRegistry::new();
    for kind in [&ENTITY, &RESOURCE, &LINK, &COMPUTE, &COMPONENT] {
        registry.register(Arc::clone(kind));
    }
    registry
});
