//! Per-property goals

use std::collections::BTreeMap;

use super::{KeyValueStore, StoreError, GOALS_KEY};
use crate::models::GoalConfig;

/// Goals keyed by property id, persisted as one JSON object
pub struct GoalsRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> GoalsRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load every saved goal; unreadable JSON yields an empty map
    pub fn load(&self) -> Result<BTreeMap<i64, GoalConfig>, StoreError> {
        let Some(raw) = self.store.get(GOALS_KEY)? else {
            return Ok(BTreeMap::new());
        };

        match serde_json::from_str(&raw) {
            Ok(goals) => Ok(goals),
            Err(e) => {
                tracing::warn!("Ignoring corrupt goals entry: {}", e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, goals: &BTreeMap<i64, GoalConfig>) -> Result<(), StoreError> {
        let json = serde_json::to_string(goals)?;
        self.store.set(GOALS_KEY, &json)
    }

    /// Goal configured for a property, if any
    pub fn goal_for(&self, property_id: i64) -> Result<Option<GoalConfig>, StoreError> {
        Ok(self.load()?.get(&property_id).copied())
    }

    /// Create or replace a property's goal
    pub fn set_goal(&self, property_id: i64, goal: GoalConfig) -> Result<(), StoreError> {
        if !goal.threshold.is_finite() {
            return Err(StoreError::Invalid(format!(
                "goal threshold must be a finite number, got {}",
                goal.threshold
            )));
        }

        let mut goals = self.load()?;
        goals.insert(property_id, goal);
        self.save(&goals)
    }

    /// Drop a property's goal, returning whether one existed
    pub fn clear_goal(&self, property_id: i64) -> Result<bool, StoreError> {
        let mut goals = self.load()?;
        if goals.remove(&property_id).is_none() {
            return Ok(false);
        }
        self.save(&goals)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;
    use crate::store::{MemoryStore, SqliteStore};

    #[test]
    fn test_set_and_get_goal() {
        let store = MemoryStore::new();
        let repo = GoalsRepository::new(&store);

        assert_eq!(repo.goal_for(1).unwrap(), None);

        repo.set_goal(1, GoalConfig::new(300.0, Metric::Amount)).unwrap();
        repo.set_goal(2, GoalConfig::new(12.5, Metric::Consumption)).unwrap();
        repo.set_goal(1, GoalConfig::new(250.0, Metric::Amount)).unwrap();

        assert_eq!(repo.goal_for(1).unwrap(), Some(GoalConfig::new(250.0, Metric::Amount)));
        assert_eq!(repo.load().unwrap().len(), 2);
    }

    #[test]
    fn test_clear_goal() {
        let store = MemoryStore::new();
        let repo = GoalsRepository::new(&store);
        repo.set_goal(3, GoalConfig::new(100.0, Metric::Amount)).unwrap();

        assert!(repo.clear_goal(3).unwrap());
        assert!(!repo.clear_goal(3).unwrap());
        assert_eq!(repo.goal_for(3).unwrap(), None);
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let store = MemoryStore::new();
        let repo = GoalsRepository::new(&store);
        let result = repo.set_goal(1, GoalConfig::new(f64::NAN, Metric::Amount));
        assert!(matches!(result, Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_reads_string_keyed_json() {
        let store = MemoryStore::new();
        store
            .set(GOALS_KEY, r#"{"7":{"threshold":3000,"metric":"amount"},"9":{"threshold":4.5,"metric":"consumption"}}"#)
            .unwrap();

        let repo = GoalsRepository::new(&store);
        assert_eq!(repo.goal_for(7).unwrap(), Some(GoalConfig::new(3000.0, Metric::Amount)));
        assert_eq!(repo.goal_for(9).unwrap().map(|g| g.metric), Some(Metric::Consumption));
    }

    #[test]
    fn test_corrupt_json_loads_as_empty() {
        let store = MemoryStore::new();
        store.set(GOALS_KEY, "[]]").unwrap();
        assert!(GoalsRepository::new(&store).load().unwrap().is_empty());
    }

    #[test]
    fn test_goals_in_sqlite_store() {
        let store = SqliteStore::in_memory().unwrap();
        let repo = GoalsRepository::new(&store);
        repo.set_goal(42, GoalConfig::new(1500.0, Metric::Amount)).unwrap();

        let raw = store.get(GOALS_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"42":{"threshold":1500.0,"metric":"amount"}}"#);
    }
}
