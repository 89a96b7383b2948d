// Copyright (c) 2025 - Cowboy AI, Inc.
//! Mixin Service
//!
//! Persists mixin definitions and the mixin/entity index, and rebuilds
//! mixins from their definitions on every lookup. Dependencies are resolved
//! recursively; a definition that depends on itself, directly or through
//! other mixins, is rejected.
//!
//! The index is one stored document updated by load, modify and save.
//! Clones of a service share a lock around that sequence; services in other
//! processes writing the same store are not coordinated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::domain::{Mixin, MixinDefinition, MixinIndex};
use crate::entity::{Entity, EntityId};
use crate::errors::{OcciError, OcciResult};
use crate::store::{StoreError, VariableStore};

/// Key prefix for mixin definitions
pub const MIXIN_PREFIX: &str = "mixin:";

/// Key of the mixin/entity index
pub const MIXIN_INDEX_KEY: &str = "mixin-index";

#[derive(Clone)]
pub struct MixinService {
    store: Arc<dyn VariableStore>,
    index_lock: Arc<Mutex<()>>,
}

impl MixinService {
    pub fn new(store: Arc<dyn VariableStore>) -> Self {
        Self {
            store,
            index_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Held across every read-modify-write of the index
    fn lock_index(&self) -> MutexGuard<'_, ()> {
        self.index_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn key(title: &str) -> String {
        format!("{MIXIN_PREFIX}{title}")
    }

    pub fn load_index(&self) -> OcciResult<MixinIndex> {
        match self.store.try_get(MIXIN_INDEX_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(MixinIndex::new()),
        }
    }

    fn save_index(&self, index: &MixinIndex) -> OcciResult<()> {
        self.store
            .upsert(MIXIN_INDEX_KEY, &serde_json::to_string(index)?)?;
        Ok(())
    }

    /// Validate and persist a definition, replacing any previous one with
    /// the same title
    pub fn add_mixin(&self, definition: &MixinDefinition) -> OcciResult<Arc<Mixin>> {
        let index = self.load_index()?;
        let mut visiting = vec![definition.title.clone()];
        let depends = definition
            .depends
            .iter()
            .map(|title| self.resolve(title, &index, &mut visiting))
            .collect::<OcciResult<Vec<_>>>()?;
        let mixin = definition.build(depends, &index.entities_of(&definition.title))?;

        self.store
            .upsert(&Self::key(&definition.title), &serde_json::to_string(definition)?)?;
        info!(title = %definition.title, mixin = %mixin.id(), "stored mixin definition");
        Ok(Arc::new(mixin))
    }

    pub fn get_definition(&self, title: &str) -> OcciResult<MixinDefinition> {
        let json = self
            .store
            .try_get(&Self::key(title))?
            .ok_or_else(|| OcciError::NotFound(format!("mixin {title}")))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild a mixin with its dependencies and carrying entities
    pub fn get_mixin_by_title(&self, title: &str) -> OcciResult<Arc<Mixin>> {
        let index = self.load_index()?;
        self.resolve(title, &index, &mut Vec::new())
    }

    fn resolve(
        &self,
        title: &str,
        index: &MixinIndex,
        visiting: &mut Vec<String>,
    ) -> OcciResult<Arc<Mixin>> {
        if visiting.iter().any(|t| t == title) {
            visiting.push(title.to_string());
            return Err(OcciError::Syntax(format!(
                "cyclic mixin dependency: {}",
                visiting.join(" -> ")
            )));
        }

        debug!(title, "resolving mixin");
        let definition = self.get_definition(title)?;
        visiting.push(title.to_string());
        let depends = definition
            .depends
            .iter()
            .map(|dependency| self.resolve(dependency, index, visiting))
            .collect::<OcciResult<Vec<_>>>()?;
        visiting.pop();

        Ok(Arc::new(definition.build(depends, &index.entities_of(title))?))
    }

    /// Titles of every stored mixin
    pub fn titles(&self) -> OcciResult<Vec<String>> {
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(MIXIN_PREFIX).map(str::to_string))
            .collect())
    }

    /// Delete a definition and detach it from every entity in the index
    pub fn remove_mixin(&self, title: &str) -> OcciResult<()> {
        self.store.delete(&Self::key(title)).map_err(|e| match e {
            StoreError::NotFound(_) => OcciError::NotFound(format!("mixin {title}")),
            other => other.into(),
        })?;

        let _guard = self.lock_index();
        let mut index = self.load_index()?;
        index.remove_mixin(title);
        self.save_index(&index)?;
        info!(title, "removed mixin");
        Ok(())
    }

    /// Record the entity's current mixins in the index, replacing what was
    /// recorded before
    pub fn add_entity(&self, entity: &Entity) -> OcciResult<()> {
        let titles: Vec<&str> = entity.mixins().iter().map(|m| m.title()).collect();
        self.set_entity_mixins(entity.id(), &titles)
    }

    /// Replace the titles recorded for an entity
    pub fn set_entity_mixins<S: AsRef<str>>(&self, id: &EntityId, titles: &[S]) -> OcciResult<()> {
        let _guard = self.lock_index();
        let mut index = self.load_index()?;
        index.remove_entity(id.as_str());
        for title in titles {
            index.add(title.as_ref(), id.as_str());
        }
        self.save_index(&index)
    }

    pub fn remove_entity(&self, id: &EntityId) -> OcciResult<()> {
        let _guard = self.lock_index();
        let mut index = self.load_index()?;
        index.remove_entity(id.as_str());
        self.save_index(&index)
    }

    /// Titles of the mixins attached to an entity, in attachment order
    pub fn get_entity_mixin_names(&self, id: &EntityId) -> OcciResult<Vec<String>> {
        Ok(self.load_index()?.mixins_of(id.as_str()))
    }

    /// Rebuilt mixins attached to an entity, in attachment order
    pub fn entity_mixins(&self, id: &EntityId) -> OcciResult<Vec<Arc<Mixin>>> {
        let index = self.load_index()?;
        index
            .mixins_of(id.as_str())
            .iter()
            .map(|title| self.resolve(title, &index, &mut Vec::new()))
            .collect()
    }
}

impl std::fmt::Debug for MixinService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixinService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AttributeMap;
    use crate::domain::identifiers::{attributes as names, models, terms, INFRASTRUCTURE_SCHEME};
    use crate::domain::Attribute;
    use crate::entity::Compute;
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn service() -> MixinService {
        MixinService::new(Arc::new(InMemoryStore::new()))
    }

    fn definition(title: &str, depends: &[&str]) -> MixinDefinition {
        MixinDefinition {
            scheme: "http://example.org/occi#".into(),
            term: title.into(),
            title: title.into(),
            attributes: vec![Attribute::string("example.note")],
            depends: depends.iter().map(|d| d.to_string()).collect(),
            applies: vec![models::COMPUTE.into()],
            values: AttributeMap::new(),
        }
    }

    #[test]
    fn test_contextualization_round_trip() {
        let service = service();
        let mut values = AttributeMap::new();
        values.insert(names::USERDATA.into(), json!("userDataTest"));
        let ctx = MixinDefinition {
            scheme: INFRASTRUCTURE_SCHEME.into(),
            term: terms::CONTEXTUALIZATION.into(),
            title: "ctx".into(),
            attributes: Vec::new(),
            depends: Vec::new(),
            applies: Vec::new(),
            values,
        };
        service.add_mixin(&ctx).unwrap();

        let mixin = service.get_mixin_by_title("ctx").unwrap();
        assert_eq!(mixin.title(), "ctx");
        assert!(mixin.declares(names::USERDATA));
        assert_eq!(service.titles().unwrap(), vec!["ctx".to_string()]);
    }

    #[test]
    fn test_contextualization_without_userdata_is_rejected() {
        let service = service();
        let ctx = MixinDefinition {
            scheme: INFRASTRUCTURE_SCHEME.into(),
            term: terms::CONTEXTUALIZATION.into(),
            title: "ctx".into(),
            attributes: Vec::new(),
            depends: Vec::new(),
            applies: Vec::new(),
            values: AttributeMap::new(),
        };
        assert!(matches!(
            service.add_mixin(&ctx),
            Err(OcciError::MissingAttribute(name)) if name == names::USERDATA
        ));
        assert!(service.titles().unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_are_resolved() {
        let service = service();
        service.add_mixin(&definition("base", &[])).unwrap();
        service.add_mixin(&definition("derived", &["base"])).unwrap();

        let derived = service.get_mixin_by_title("derived").unwrap();
        assert_eq!(derived.depends().len(), 1);
        assert_eq!(derived.depends()[0].title(), "base");
    }

    #[test]
    fn test_missing_dependency_is_not_found() {
        let service = service();
        assert!(matches!(
            service.add_mixin(&definition("orphan", &["ghost"])),
            Err(OcciError::NotFound(_))
        ));
    }

    #[test]
    fn test_self_dependency_is_rejected() {
        let service = service();
        assert!(matches!(
            service.add_mixin(&definition("loop", &["loop"])),
            Err(OcciError::Syntax(_))
        ));
    }

    #[test]
    fn test_stored_cycle_is_rejected() {
        let service = service();
        service.add_mixin(&definition("a", &[])).unwrap();
        service.add_mixin(&definition("b", &["a"])).unwrap();
        // redefine a on top of b after the fact
        service
            .store
            .put(
                &MixinService::key("a"),
                &serde_json::to_string(&definition("a", &["b"])).unwrap(),
            )
            .unwrap();

        let err = service.get_mixin_by_title("a").unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_remove_unknown_mixin() {
        assert!(matches!(
            service().remove_mixin("ghost"),
            Err(OcciError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_index_updates_are_kept() {
        let service = service();
        service.add_mixin(&definition("note", &[])).unwrap();
        let note = service.get_mixin_by_title("note").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let service = service.clone();
                let note = note.clone();
                std::thread::spawn(move || {
                    let vm = Compute::builder()
                        .id(format!("vm{n}"))
                        .add_mixins([note])
                        .unwrap()
                        .build()
                        .unwrap();
                    service.add_entity(vm.entity()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(service.load_index().unwrap().entities_of("note").len(), 8);
    }
}
