// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute transformer

use super::{cast_error, entity_variables, mixin_variables, resource_variables};
use super::{Transformer, TransformerType};
use crate::domain::identifiers::attributes as names;
use crate::entity::OcciEntity;
use crate::errors::OcciResult;
use crate::model::Model;

/// Flattens a compute into its automation model
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeTransformer;

impl Transformer for ComputeTransformer {
    fn transformer_type(&self) -> TransformerType {
        TransformerType::Compute
    }

    fn to_model(&self, entity: &OcciEntity, action_type: &str) -> OcciResult<Model> {
        let compute = entity
            .as_compute()
            .ok_or_else(|| cast_error(self.transformer_type(), entity))?;

        let model = Model::builder(compute.entity().kind().title(), action_type);
        let model = entity_variables(model, compute.entity())
            .optional(names::ARCHITECTURE, compute.architecture())
            .optional(names::CORES, compute.cores())
            .optional(names::SHARE, compute.share())
            .optional(names::HOSTNAME, compute.hostname())
            .optional(names::MEMORY, compute.memory())
            .optional(names::STATE, compute.state())
            .optional(names::STATE_MESSAGE, compute.message());
        let model = resource_variables(model, compute.resource())?;

        Ok(mixin_variables(model, compute.entity()).build())
    }
}
