// Copyright (c) 2025 - Cowboy AI, Inc.
//! Instance Service
//!
//! Entity lifecycle against the automation store. Instances are stored as
//! automation models under `instance:<id>`; reading one back dispatches a
//! builder on the model's service model and re-attaches the mixins recorded
//! in the mixin index.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::mixin::MixinService;
use crate::builder::{BuilderRegistry, EntityBuilder, EntityRequest};
use crate::config::EngineConfig;
use crate::domain::identifiers::actions;
use crate::domain::ComputeAction;
use crate::entity::{ComputeState, EntityId, OcciEntity};
use crate::errors::{OcciError, OcciResult};
use crate::model::Model;
use crate::rendering::EntityRendering;
use crate::state_machine::StateMachine;
use crate::store::{StoreError, VariableStore};
use crate::transformer::{TransformerManager, TransformerType};

/// Key prefix for instance models
pub const INSTANCE_PREFIX: &str = "instance:";

pub struct InstanceService {
    store: Arc<dyn VariableStore>,
    mixins: MixinService,
    builders: BuilderRegistry,
    transformers: TransformerManager,
}

impl InstanceService {
    pub fn new(store: Arc<dyn VariableStore>, config: &EngineConfig) -> Self {
        Self {
            mixins: MixinService::new(store.clone()),
            builders: BuilderRegistry::from_config(config),
            transformers: TransformerManager::default(),
            store,
        }
    }

    pub fn with_builders(mut self, builders: BuilderRegistry) -> Self {
        self.builders = builders;
        self
    }

    pub fn mixins(&self) -> &MixinService {
        &self.mixins
    }

    pub fn builders(&self) -> &BuilderRegistry {
        &self.builders
    }

    pub fn transformers(&self) -> &TransformerManager {
        &self.transformers
    }

    fn key(id: &EntityId) -> String {
        format!("{INSTANCE_PREFIX}{id}")
    }

    /// Build an entity from an inbound document, resolving its mixins by title
    pub fn build_entity(&self, request: &EntityRequest) -> OcciResult<OcciEntity> {
        let mixins = request
            .mixins
            .iter()
            .map(|title| self.mixins.get_mixin_by_title(title))
            .collect::<OcciResult<Vec<_>>>()?;
        self.builders.build(request, mixins)
    }

    fn load_model(&self, id: &EntityId) -> OcciResult<Option<Model>> {
        self.store
            .try_get(&Self::key(id))?
            .map(|json| Model::from_json(&json))
            .transpose()
    }

    fn builder_from_store(&self, id: &EntityId) -> OcciResult<Option<Box<dyn EntityBuilder>>> {
        match self.load_model(id)? {
            Some(model) => self.builders.from_model(&model).map(Some),
            None => Ok(None),
        }
    }

    /// Stored entity with its mixins re-attached
    pub fn get_entity(&self, id: &EntityId) -> OcciResult<Option<OcciEntity>> {
        let Some(mut builder) = self.builder_from_store(id)? else {
            debug!(id = %id, "instance not found");
            return Ok(None);
        };
        builder.attach_mixins(self.mixins.entity_mixins(id)?)?;
        builder.build_entity().map(Some)
    }

    /// Stored entity without mixin resolution
    pub fn get_mocked_entity(&self, id: &EntityId) -> OcciResult<Option<OcciEntity>> {
        self.builder_from_store(id)?
            .map(|builder| builder.build_entity())
            .transpose()
    }

    /// Every stored instance, rendered
    pub fn list_renderings(&self) -> OcciResult<Vec<EntityRendering>> {
        let mut renderings = Vec::new();
        for key in self.store.keys()? {
            let Some(id) = key.strip_prefix(INSTANCE_PREFIX) else {
                continue;
            };
            match self.get_entity(&EntityId::new(id)) {
                Ok(Some(entity)) => renderings.push(entity.render()),
                Ok(None) => warn!(key = %key, "instance vanished while listing"),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable instance"),
            }
        }
        Ok(renderings)
    }

    /// Persist a new instance and return it as read back from the store
    ///
    /// Nothing stays stored when the instance cannot be read back.
    pub fn create(
        &self,
        entity: &OcciEntity,
        transformer_type: TransformerType,
    ) -> OcciResult<OcciEntity> {
        let model = self
            .transformers
            .get(transformer_type)?
            .to_model(entity, actions::CREATE)?;
        self.check_mixins(entity)?;
        self.store.post(&Self::key(entity.id()), &model.to_json()?)?;

        let created = self
            .mixins
            .add_entity(entity.entity())
            .and_then(|()| self.reload(entity.id()));
        match created {
            Ok(created) => {
                info!(id = %entity.id(), kind = %entity.kind().title(), "created instance");
                Ok(created)
            }
            Err(e) => {
                self.rollback_create(entity.id());
                Err(e)
            }
        }
    }

    /// Replace a stored instance
    ///
    /// The previous model and mixin entries are put back when the
    /// replacement cannot be read back.
    pub fn update(
        &self,
        entity: &OcciEntity,
        transformer_type: TransformerType,
    ) -> OcciResult<OcciEntity> {
        let model = self
            .transformers
            .get(transformer_type)?
            .to_model(entity, actions::UPDATE)?;
        let id = entity.id();
        let previous = self
            .load_model(id)?
            .ok_or_else(|| OcciError::NotFound(format!("instance {id}")))?;
        let previous_mixins = self.mixins.get_entity_mixin_names(id)?;
        self.check_mixins(entity)?;
        self.put_model(id, &model)?;

        let updated = self
            .mixins
            .add_entity(entity.entity())
            .and_then(|()| self.reload(id));
        match updated {
            Ok(updated) => {
                info!(id = %id, "updated instance");
                Ok(updated)
            }
            Err(e) => {
                self.rollback_update(id, &previous, &previous_mixins);
                Err(e)
            }
        }
    }

    /// Every attached mixin must have a stored definition, otherwise the
    /// instance could not be read back once written
    fn check_mixins(&self, entity: &OcciEntity) -> OcciResult<()> {
        for mixin in entity.entity().mixins() {
            self.mixins.get_mixin_by_title(mixin.title())?;
        }
        Ok(())
    }

    fn rollback_create(&self, id: &EntityId) {
        warn!(id = %id, "rolling back instance create");
        if let Err(e) = self.store.delete(&Self::key(id)) {
            warn!(id = %id, error = %e, "failed to remove instance model");
        }
        if let Err(e) = self.mixins.remove_entity(id) {
            warn!(id = %id, error = %e, "failed to remove mixin index entries");
        }
    }

    fn rollback_update(&self, id: &EntityId, previous: &Model, mixins: &[String]) {
        warn!(id = %id, "rolling back instance update");
        if let Err(e) = self.put_model(id, previous) {
            warn!(id = %id, error = %e, "failed to restore instance model");
        }
        if let Err(e) = self.mixins.set_entity_mixins(id, mixins) {
            warn!(id = %id, error = %e, "failed to restore mixin index entries");
        }
    }

    pub fn delete(&self, id: &EntityId) -> OcciResult<()> {
        self.store
            .delete(&Self::key(id))
            .map_err(|e| not_found(e, id))?;
        self.mixins.remove_entity(id)?;
        info!(id = %id, "deleted instance");
        Ok(())
    }

    /// Run a compute action and persist the resulting state
    ///
    /// A compute without a recorded state is treated as inactive.
    pub fn apply_action(&self, id: &EntityId, action: ComputeAction) -> OcciResult<OcciEntity> {
        let entity = self
            .get_entity(id)?
            .ok_or_else(|| OcciError::NotFound(format!("instance {id}")))?;
        let compute = entity.as_compute().ok_or_else(|| {
            OcciError::Syntax(format!(
                "action {action} needs a compute, {id} is a {}",
                entity.kind().title()
            ))
        })?;

        let current = compute.state().unwrap_or(ComputeState::Inactive);
        let (next, output) = current.transition(&action)?;
        for warning in &output.warnings {
            warn!(id = %id, action = %action, "{warning}");
        }

        let updated: OcciEntity = compute.to_builder().state(next).build()?.into();
        let model = self
            .transformers
            .get(TransformerType::Compute)?
            .to_model(&updated, action.term())?;
        self.put_model(id, &model)?;
        info!(id = %id, action = %action, from = %current, to = %next, "applied action");

        Ok(updated)
    }

    fn put_model(&self, id: &EntityId, model: &Model) -> OcciResult<()> {
        self.store
            .put(&Self::key(id), &model.to_json()?)
            .map_err(|e| not_found(e, id))
    }

    fn reload(&self, id: &EntityId) -> OcciResult<OcciEntity> {
        self.get_entity(id)?
            .ok_or_else(|| OcciError::Server(format!("instance {id} missing right after write")))
    }
}

fn not_found(err: StoreError, id: &EntityId) -> OcciError {
    match err {
        StoreError::NotFound(_) => OcciError::NotFound(format!("instance {id}")),
        other => other.into(),
    }
}

impl std::fmt::Debug for InstanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceService")
            .field("builders", &self.builders)
            .field("transformers", &self.transformers)
            .finish_non_exhaustive()
    }
}
