//! Pinned analytics widgets

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, FAVORITES_KEY};
use crate::models::{FavoriteChartConfig, Grouping, Metric, RangePreset};

/// Number of favorites shown on the dashboard
pub const DASHBOARD_FAVORITES: usize = 4;

/// Widget settings captured from the analytics page before saving
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoriteDraft {
    /// Empty means "pick a default name"
    pub name: String,
    pub properties: Vec<i64>,
    pub resource_type: String,
    pub range_preset: RangePreset,
    pub metric: Metric,
    pub grouping: Grouping,
}

/// Favorite widgets persisted under a single store key
pub struct FavoritesRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> FavoritesRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load saved favorites in insertion order
    ///
    /// A missing key or unreadable JSON yields an empty list.
    pub fn load(&self) -> Result<Vec<FavoriteChartConfig>, StoreError> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<FavoriteChartConfig>>(&raw) {
            Ok(favorites) => Ok(favorites),
            Err(e) => {
                tracing::warn!("Ignoring corrupt favorites entry: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the whole list
    pub fn save(&self, favorites: &[FavoriteChartConfig]) -> Result<(), StoreError> {
        let json = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &json)
    }

    /// Append a widget and return it
    ///
    /// Refused when no property is selected. Unnamed drafts become
    /// `Виджет N` where N is the new list length.
    pub fn add(&self, draft: FavoriteDraft) -> Result<FavoriteChartConfig, StoreError> {
        if draft.properties.is_empty() {
            return Err(StoreError::Invalid(
                "a favorite needs at least one property".to_string(),
            ));
        }

        let mut favorites = self.load()?;

        let name = match draft.name.trim() {
            "" => format!("Виджет {}", favorites.len() + 1),
            name => name.to_string(),
        };

        let favorite = FavoriteChartConfig {
            id: next_id(&favorites),
            name,
            properties: draft.properties,
            resource_type: draft.resource_type,
            range_preset: draft.range_preset,
            metric: draft.metric,
            grouping: draft.grouping,
        };

        favorites.push(favorite.clone());
        self.save(&favorites)?;
        tracing::debug!("Saved favorite {} ({})", favorite.id, favorite.name);

        Ok(favorite)
    }

    /// Remove a widget by id, returning whether anything was removed
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut favorites = self.load()?;
        let before = favorites.len();
        favorites.retain(|f| f.id != id);

        if favorites.len() == before {
            return Ok(false);
        }

        self.save(&favorites)?;
        Ok(true)
    }
}

/// Millisecond timestamp id, bumped past any id already taken
fn next_id(existing: &[FavoriteChartConfig]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while existing.iter().any(|f| f.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn draft(name: &str, properties: Vec<i64>) -> FavoriteDraft {
        FavoriteDraft {
            name: name.to_string(),
            properties,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new();
        let repo = FavoritesRepository::new(&store);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_add_assigns_default_names() {
        let store = MemoryStore::new();
        let repo = FavoritesRepository::new(&store);

        let first = repo.add(draft("", vec![1])).unwrap();
        let second = repo.add(draft("  ", vec![1, 2])).unwrap();
        let third = repo.add(draft("Свет", vec![2])).unwrap();

        assert_eq!(first.name, "Виджет 1");
        assert_eq!(second.name, "Виджет 2");
        assert_eq!(third.name, "Свет");
        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);

        let names: Vec<String> = repo.load().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Виджет 1", "Виджет 2", "Свет"]);
    }

    #[test]
    fn test_add_without_properties_is_refused() {
        let store = MemoryStore::new();
        let repo = FavoritesRepository::new(&store);

        let result = repo.add(draft("Пусто", vec![]));
        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let store = MemoryStore::new();
        let repo = FavoritesRepository::new(&store);

        let kept = repo.add(draft("A", vec![1])).unwrap();
        let dropped = repo.add(draft("B", vec![2])).unwrap();

        assert!(repo.remove(&dropped.id).unwrap());
        assert!(!repo.remove("no-such-id").unwrap());

        let remaining = repo.load().unwrap();
        assert_eq!(remaining, vec![kept]);
    }

    #[test]
    fn test_corrupt_json_loads_as_empty() {
        let store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();

        let repo = FavoritesRepository::new(&store);
        assert!(repo.load().unwrap().is_empty());

        // The next save replaces the corrupt entry
        repo.add(draft("", vec![5])).unwrap();
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_web_client_entries() {
        let store = MemoryStore::new();
        store
            .set(
                FAVORITES_KEY,
                r#"[{"id":"1","name":"Вода","properties":[7],"resourceType":"cold_water","rangePreset":"quarter","metric":"consumption","grouping":"total"}]"#,
            )
            .unwrap();

        let favorites = FavoritesRepository::new(&store).load().unwrap();
        assert_eq!(favorites[0].range_preset, RangePreset::Quarter);
        assert_eq!(favorites[0].resource_type, "cold_water");
    }

    #[test]
    fn test_next_id_skips_taken_ids() {
        let now = Utc::now().timestamp_millis();
        let taken: Vec<FavoriteChartConfig> = (0..3)
            .map(|offset| FavoriteChartConfig {
                id: (now + offset).to_string(),
                name: String::new(),
                properties: vec![1],
                resource_type: String::new(),
                range_preset: RangePreset::Year,
                metric: Metric::Amount,
                grouping: Grouping::Total,
            })
            .collect();

        let id = next_id(&taken);
        assert!(taken.iter().all(|f| f.id != id));
    }
}
