use std::collections::HashMap;

use tracing::debug;

use crate::artifacts::{CatalogArtifact, ModelLoadError};
use crate::models::{Item, ItemId};

/// Canonical item registry with free-text name resolution.
///
/// Cart input arrives as whatever the client typed, so every lookup goes
/// through the same normalization as the alias table: trim, collapse inner
/// whitespace, case-fold. The canonical display name itself is always
/// registered as an alias of the item.
#[derive(Debug)]
pub struct ItemCatalog {
    items: HashMap<ItemId, Item>,
    aliases: HashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn from_artifact(artifact: &CatalogArtifact) -> Result<Self, ModelLoadError> {
        if artifact.items.is_empty() {
            return Err(ModelLoadError::EmptyCatalog);
        }

        let mut items: HashMap<ItemId, Item> = HashMap::with_capacity(artifact.items.len());
        let mut aliases: HashMap<String, ItemId> = HashMap::new();

        for entry in &artifact.items {
            if entry.popularity_weight < 0.0 {
                return Err(ModelLoadError::NegativePopularity {
                    item: entry.id,
                    weight: entry.popularity_weight,
                });
            }
            if items.contains_key(&entry.id) {
                return Err(ModelLoadError::DuplicateItemId(entry.id));
            }

            for alias in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let normalized = normalize_name(alias);
                if normalized.is_empty() {
                    continue;
                }
                if let Some(&existing) = aliases.get(&normalized) {
                    if existing != entry.id {
                        return Err(ModelLoadError::DuplicateAlias {
                            alias: normalized,
                            first: existing,
                            second: entry.id,
                        });
                    }
                } else {
                    aliases.insert(normalized, entry.id);
                }
            }

            items.insert(
                entry.id,
                Item {
                    id: entry.id,
                    name: entry.name.clone(),
                    popularity_weight: entry.popularity_weight,
                    feature_vector: entry.feature_vector.clone(),
                },
            );
        }

        Ok(Self { items, aliases })
    }

    /// Resolve a raw cart entry to its item id. `None` means the name is
    /// out of vocabulary; the caller decides the fallback policy.
    pub fn resolve(&self, raw_name: &str) -> Option<ItemId> {
        let normalized = normalize_name(raw_name);
        let resolved = self.aliases.get(&normalized).copied();
        if resolved.is_none() {
            debug!(name = %raw_name, "cart item not in catalog");
        }
        resolved
    }

    pub fn display_name(&self, id: ItemId) -> Option<&str> {
        self.items.get(&id).map(|item| item.name.as_str())
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }
}

/// Normalization applied to both the alias table and incoming lookups:
/// trim, collapse runs of whitespace to a single space, lowercase.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
