// Copyright (c) 2025 - Cowboy AI, Inc.
//! OCCI Identifiers
//!
//! Schemes, terms, wire attribute names and model names shared by the
//! metamodel, the builders and the transformers.

/// Scheme of the OCCI core kinds (entity, resource, link)
pub const CORE_SCHEME: &str = "http://schemas.ogf.org/occi/core#";

/// Scheme of the OCCI infrastructure kinds and mixins
pub const INFRASTRUCTURE_SCHEME: &str = "http://schemas.ogf.org/occi/infrastructure#";

/// Scheme of the infrastructure credential mixins
pub const CREDENTIALS_SCHEME: &str = "http://schemas.ogf.org/occi/infrastructure/credentials#";

/// Scheme of the compute actions
pub const COMPUTE_ACTION_SCHEME: &str =
    "http://schemas.ogf.org/occi/infrastructure/compute/action#";

/// Scheme of the OCCI platform kinds
pub const PLATFORM_SCHEME: &str = "http://schemas.ogf.org/occi/platform#";

/// Kind and mixin terms
pub mod terms {
    pub const ENTITY: &str = "entity";
    pub const RESOURCE: &str = "resource";
    pub const LINK: &str = "link";
    pub const COMPUTE: &str = "compute";
    pub const COMPONENT: &str = "component";
    pub const CONTEXTUALIZATION: &str = "user_data";
    pub const SSH_KEY: &str = "ssh_key";

    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const RESTART: &str = "restart";
    pub const SUSPEND: &str = "suspend";
}

/// Model names: the kind identifiers reported on the wire and by the store
pub mod models {
    pub const ENTITY: &str = "occi.core.entity";
    pub const RESOURCE: &str = "occi.core.resource";
    pub const LINK: &str = "occi.core.link";
    pub const COMPUTE: &str = "occi.infrastructure.compute";
    pub const COMPONENT: &str = "occi.platform.component";
}

/// Wire attribute names
pub mod attributes {
    pub const ID: &str = "occi.core.id";
    pub const TITLE: &str = "occi.core.title";
    pub const SUMMARY: &str = "occi.core.summary";
    pub const SOURCE: &str = "occi.core.source";
    pub const TARGET: &str = "occi.core.target";

    /// Model variable carrying a resource's outgoing links as a JSON array
    /// of link renderings
    pub const LINKS: &str = "occi.core.links";

    pub const ARCHITECTURE: &str = "occi.compute.architecture";
    pub const CORES: &str = "occi.compute.cores";
    pub const SHARE: &str = "occi.compute.share";
    pub const HOSTNAME: &str = "occi.compute.hostname";
    pub const MEMORY: &str = "occi.compute.memory";
    pub const STATE: &str = "occi.compute.state";
    pub const STATE_MESSAGE: &str = "occi.compute.state.message";

    pub const USERDATA: &str = "occi.compute.userdata";
    pub const SSH_PUBLIC_KEY: &str = "occi.credentials.ssh.publickey";

    pub const COMPONENT_STATE: &str = "occi.component.state";
}

/// Action types tagged onto automation models
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// Join a scheme and a term into the OCCI type identifier
pub fn type_identifier(scheme: &str, term: &str) -> String {
    format!("{scheme}{term}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_identifier() {
        assert_eq!(
            type_identifier(INFRASTRUCTURE_SCHEME, terms::COMPUTE),
            "http://schemas.ogf.org/occi/infrastructure#compute"
        );
    }
}
