use std::collections::{HashMap, HashSet};

use super::CandidateSource;
use crate::artifacts::{CoOccurrenceArtifact, ModelLoadError};
use crate::models::{Candidate, ItemId, RecallSource};
use crate::services::catalog::ItemCatalog;

/// Item-to-item co-occurrence recall.
///
/// The index is computed offline from co-purchase history ("carts that
/// contained X also contained Y"). At serving time each cart item
/// contributes its neighbor list; weights for the same neighbor are summed
/// across cart items, cart members are excluded, and the surviving set is
/// max-normalized into [0,1].
#[derive(Debug)]
pub struct CoOccurrenceRecall {
    index: HashMap<ItemId, Vec<(ItemId, f32)>>,
}

impl CoOccurrenceRecall {
    pub fn from_artifact(
        artifact: &CoOccurrenceArtifact,
        catalog: &ItemCatalog,
    ) -> Result<Self, ModelLoadError> {
        let mut index: HashMap<ItemId, Vec<(ItemId, f32)>> =
            HashMap::with_capacity(artifact.pairs.len());

        for (&item, neighbors) in &artifact.pairs {
            if !catalog.contains(item) {
                return Err(ModelLoadError::UnknownCoOccurrenceItem(item));
            }

            let mut list = Vec::with_capacity(neighbors.len());
            for &(neighbor, weight) in neighbors {
                if !catalog.contains(neighbor) {
                    return Err(ModelLoadError::UnknownCoOccurrenceItem(neighbor));
                }
                if weight < 0.0 {
                    return Err(ModelLoadError::NegativeCoOccurrenceWeight {
                        item,
                        neighbor,
                        weight,
                    });
                }
                list.push((neighbor, weight));
            }

            // Re-sort at load so serving order never depends on file order.
            list.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            index.insert(item, list);
        }

        Ok(Self { index })
    }

    pub fn entry_count(&self) -> usize {
        self.index.len()
    }
}

impl CandidateSource for CoOccurrenceRecall {
    fn generate(&self, cart: &[ItemId], limit: usize) -> Vec<Candidate> {
        let cart_set: HashSet<ItemId> = cart.iter().copied().collect();

        // 跨購物車項目累加鄰居權重
        let mut accumulated: HashMap<ItemId, f32> = HashMap::new();
        for item in cart {
            let Some(neighbors) = self.index.get(item) else {
                continue;
            };
            for &(neighbor, weight) in neighbors {
                if cart_set.contains(&neighbor) {
                    continue;
                }
                *accumulated.entry(neighbor).or_insert(0.0) += weight;
            }
        }

        let mut scored: Vec<(ItemId, f32)> = accumulated.into_iter().collect();
        // Weight descending, ascending item id on ties. The explicit
        // tie-break keeps output independent of map iteration order.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(limit);

        let max_weight = scored.first().map(|&(_, w)| w).unwrap_or(0.0);

        scored
            .into_iter()
            .map(|(item_id, weight)| Candidate {
                item_id,
                recall_source: RecallSource::CoOccurrence,
                base_score: if max_weight > 0.0 {
                    weight / max_weight
                } else {
                    0.0
                },
            })
            .collect()
    }

    fn source(&self) -> RecallSource {
        RecallSource::CoOccurrence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{CatalogArtifact, CatalogItem};

    fn catalog_with_ids(ids: &[ItemId]) -> ItemCatalog {
        let items = ids
            .iter()
            .map(|&id| CatalogItem {
                id,
                name: format!("Item {id}"),
                aliases: Vec::new(),
                popularity_weight: 0.5,
                feature_vector: None,
            })
            .collect();
        ItemCatalog::from_artifact(&CatalogArtifact { items }).unwrap()
    }

    fn recall_from(pairs: Vec<(ItemId, Vec<(ItemId, f32)>)>, catalog: &ItemCatalog) -> CoOccurrenceRecall {
        let artifact = CoOccurrenceArtifact {
            pairs: pairs.into_iter().collect(),
        };
        CoOccurrenceRecall::from_artifact(&artifact, catalog).unwrap()
    }

    #[test]
    fn test_weights_sum_across_cart_items() {
        let catalog = catalog_with_ids(&[1, 2, 3, 4]);
        let recall = recall_from(
            vec![(1, vec![(3, 4.0), (4, 2.0)]), (2, vec![(3, 6.0)])],
            &catalog,
        );

        let candidates = recall.generate(&[1, 2], 10);

        // Item 3 accumulates 4 + 6 = 10 and normalizes to 1.0; item 4 is 2/10.
        assert_eq!(candidates[0].item_id, 3);
        assert!((candidates[0].base_score - 1.0).abs() < f32::EPSILON);
        assert_eq!(candidates[1].item_id, 4);
        assert!((candidates[1].base_score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_cart_items_excluded() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let recall = recall_from(vec![(1, vec![(2, 5.0), (3, 1.0)])], &catalog);

        let candidates = recall.generate(&[1, 2], 10);
        assert!(candidates.iter().all(|c| c.item_id != 1 && c.item_id != 2));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_tie_break_ascending_id() {
        let catalog = catalog_with_ids(&[1, 5, 9]);
        let recall = recall_from(vec![(1, vec![(9, 3.0), (5, 3.0)])], &catalog);

        let candidates = recall.generate(&[1], 10);
        assert_eq!(candidates[0].item_id, 5);
        assert_eq!(candidates[1].item_id, 9);
    }

    #[test]
    fn test_all_zero_weights_score_zero() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let recall = recall_from(vec![(1, vec![(2, 0.0), (3, 0.0)])], &catalog);

        let candidates = recall.generate(&[1], 10);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.base_score == 0.0));
        // Order still deterministic by id.
        assert_eq!(candidates[0].item_id, 2);
    }

    #[test]
    fn test_limit_respected() {
        let catalog = catalog_with_ids(&[1, 2, 3, 4, 5]);
        let recall = recall_from(
            vec![(1, vec![(2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0)])],
            &catalog,
        );

        let candidates = recall.generate(&[1], 2);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].item_id, 2);
        assert_eq!(candidates[1].item_id, 3);
    }

    #[test]
    fn test_unknown_neighbor_rejected_at_load() {
        let catalog = catalog_with_ids(&[1]);
        let artifact = CoOccurrenceArtifact {
            pairs: [(1, vec![(99, 1.0)])].into_iter().collect(),
        };
        let err = CoOccurrenceRecall::from_artifact(&artifact, &catalog).unwrap_err();
        assert!(matches!(err, ModelLoadError::UnknownCoOccurrenceItem(99)));
    }

    #[test]
    fn test_negative_weight_rejected_at_load() {
        let catalog = catalog_with_ids(&[1, 2]);
        let artifact = CoOccurrenceArtifact {
            pairs: [(1, vec![(2, -0.5)])].into_iter().collect(),
        };
        let err = CoOccurrenceRecall::from_artifact(&artifact, &catalog).unwrap_err();
        assert!(matches!(
            err,
            ModelLoadError::NegativeCoOccurrenceWeight { .. }
        ));
    }
}
