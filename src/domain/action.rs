// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI Actions
//!
//! Actions are operations invokable on an entity. Compute exposes four of
//! them; each is a process-wide descriptor identified by scheme+term.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::attribute::Attribute;
use super::identifiers::{terms, type_identifier, COMPUTE_ACTION_SCHEME};
use crate::errors::OcciError;

/// Action descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    scheme: String,
    term: String,
    title: String,
    attributes: Vec<Attribute>,
}

impl Action {
    pub fn new(scheme: impl Into<String>, term: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            term: term.into(),
            title: title.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn type_identifier(&self) -> String {
        type_identifier(&self.scheme, &self.term)
    }
}

static START: Lazy<Action> =
    Lazy::new(|| Action::new(COMPUTE_ACTION_SCHEME, terms::START, "start compute"));
static STOP: Lazy<Action> =
    Lazy::new(|| Action::new(COMPUTE_ACTION_SCHEME, terms::STOP, "stop compute"));
static RESTART: Lazy<Action> =
    Lazy::new(|| Action::new(COMPUTE_ACTION_SCHEME, terms::RESTART, "restart compute"));
static SUSPEND: Lazy<Action> =
    Lazy::new(|| Action::new(COMPUTE_ACTION_SCHEME, terms::SUSPEND, "suspend compute"));

/// Actions a compute instance supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeAction {
    Start,
    Stop,
    Restart,
    Suspend,
}

impl ComputeAction {
    pub const ALL: [ComputeAction; 4] = [Self::Start, Self::Stop, Self::Restart, Self::Suspend];

    pub fn descriptor(&self) -> &'static Action {
        match self {
            Self::Start => &*START,
            Self::Stop => &*STOP,
            Self::Restart => &*RESTART,
            Self::Suspend => &*SUSPEND,
        }
    }

    /// Term, also used as the automation model's action type
    pub fn term(&self) -> &'static str {
        match self {
            Self::Start => terms::START,
            Self::Stop => terms::STOP,
            Self::Restart => terms::RESTART,
            Self::Suspend => terms::SUSPEND,
        }
    }
}

impl fmt::Display for ComputeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term())
    }
}

impl FromStr for ComputeAction {
    type Err = OcciError;

    /// Accepts a bare term or a full action type identifier
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let term = s.strip_prefix(COMPUTE_ACTION_SCHEME).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|action| action.term().eq_ignore_ascii_case(term))
            .ok_or_else(|| OcciError::Syntax(format!("unknown compute action: {s}")))
    }
}
