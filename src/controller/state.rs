use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hass::EntityState;

/// This controller mirrors the host's entity map, so that panels can
/// look up the latest snapshot of their configured sensor.
///
/// Snapshots are replaced wholesale, never patched: each render
/// observes a complete, internally consistent state.
#[derive(Clone)]
pub struct StateController {
    states: Arc<RwLock<HashMap<String, EntityState>>>,
}

/// Read access to the mirrored host state store.
#[async_trait]
pub trait LiveStates: Send + Sync {
    /// The latest snapshot of the given entity, if the host knows it.
    async fn entity(&self, entity_id: &str) -> Option<EntityState>;

    /// The ids of all entities carrying the given prefix, sorted.
    async fn entity_ids(&self, prefix: &str) -> Vec<String>;
}

impl StateController {
    pub fn init(initial: Vec<EntityState>) -> Self {
        let states = initial
            .into_iter()
            .map(|state| (state.entity_id.clone(), state))
            .collect();
        StateController {
            states: Arc::new(RwLock::new(states)),
        }
    }

    /// Replace an entity's snapshot. Returns `true` when the entity
    /// was not in the store before.
    pub async fn set(&self, state: EntityState) -> bool {
        let mut states = self.states.write().await;
        states.insert(state.entity_id.clone(), state).is_none()
    }
}

#[async_trait]
impl LiveStates for StateController {
    async fn entity(&self, entity_id: &str) -> Option<EntityState> {
        self.states.read().await.get(entity_id).cloned()
    }

    async fn entity_ids(&self, prefix: &str) -> Vec<String> {
        let states = self.states.read().await;
        let mut ids: Vec<String> = states
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
