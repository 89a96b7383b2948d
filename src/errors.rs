// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for metamodel, builder and transformation operations

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while building, rendering or transforming OCCI entities
#[derive(Debug, Error)]
pub enum OcciError {
    /// A required attribute is absent from the inbound attribute map
    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    /// An attribute is present but does not parse as its declared type
    #[error("Attribute {name} expects {expected}, got {found}")]
    InvalidAttributeType {
        name: String,
        expected: String,
        found: String,
    },

    /// An attribute has the right type but an unacceptable value
    #[error("Invalid value for attribute {name}: {reason}")]
    InvalidAttributeValue { name: String, reason: String },

    /// Attribute name not present in the catalog
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Attribute registered twice with different value types
    #[error("Attribute {0} is already registered with a different type")]
    DuplicateAttribute(String),

    /// Attribute declared at two levels of a kind hierarchy with different types
    #[error("Attribute {name} conflicts with an inherited declaration in kind {kind}")]
    AttributeConflict { kind: String, name: String },

    /// Mixin attached to an entity whose kind it does not apply to
    #[error("Mixin {mixin} cannot be applied to kind {kind}")]
    MixinNotApplicable { mixin: String, kind: String },

    /// Mixin attached twice to the same entity
    #[error("Mixin {0} is already attached")]
    DuplicateMixin(String),

    /// Mixin attached before one of the mixins it depends on
    #[error("Mixin {mixin} depends on {dependency}, which is not attached")]
    MissingDependency { mixin: String, dependency: String },

    /// Kind model name not present in the dispatch table (strict mode only)
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// Action not allowed from the current compute state
    #[error("Action {action} is not allowed in state {state}")]
    InvalidTransition { state: String, action: String },

    /// Malformed inbound document
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Entity or mixin absent from the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal dispatch or cast mismatch, always a bug
    #[error("Server error: {0}")]
    Server(String),

    /// Failure reported by the cloud automation store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for OCCI operations
pub type OcciResult<T> = Result<T, OcciError>;

impl OcciError {
    /// Whether the error was caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// HTTP status equivalent surfaced by the REST layer
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingAttribute(_)
            | Self::InvalidAttributeType { .. }
            | Self::InvalidAttributeValue { .. }
            | Self::UnknownKind(_)
            | Self::Syntax(_) => 400,
            Self::NotFound(_) | Self::Store(StoreError::NotFound(_)) => 404,
            Self::DuplicateMixin(_)
            | Self::InvalidTransition { .. }
            | Self::Store(StoreError::Conflict(_)) => 409,
            Self::MixinNotApplicable { .. } | Self::MissingDependency { .. } => 422,
            Self::UnknownAttribute(_)
            | Self::DuplicateAttribute(_)
            | Self::AttributeConflict { .. }
            | Self::Server(_)
            | Self::Serialization(_)
            | Self::Configuration(_) => 500,
            Self::Store(_) => 502,
        }
    }
}

impl From<serde_json::Error> for OcciError {
    fn from(err: serde_json::Error) -> Self {
        OcciError::Serialization(err.to_string())
    }
}
