use std::collections::HashSet;

use super::CandidateSource;
use crate::models::{Candidate, ItemId, RecallSource};
use crate::services::catalog::ItemCatalog;

/// Global popularity recall, the cold-start fallback.
///
/// When the cart carries no usable co-occurrence signal we still have to
/// answer with something sensible, so this source ranks the whole catalog
/// by its offline popularity weight. The ranking is precomputed once at
/// construction; serving only filters and normalizes.
pub struct PopularityRecall {
    ranking: Vec<(ItemId, f32)>,
}

impl PopularityRecall {
    pub fn from_catalog(catalog: &ItemCatalog) -> Self {
        let mut ranking: Vec<(ItemId, f32)> = catalog
            .items()
            .map(|item| (item.id, item.popularity_weight))
            .collect();

        ranking.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        Self { ranking }
    }
}

impl CandidateSource for PopularityRecall {
    fn generate(&self, cart: &[ItemId], limit: usize) -> Vec<Candidate> {
        let cart_set: HashSet<ItemId> = cart.iter().copied().collect();

        let selected: Vec<(ItemId, f32)> = self
            .ranking
            .iter()
            .filter(|(id, _)| !cart_set.contains(id))
            .take(limit)
            .copied()
            .collect();

        let max_weight = selected.first().map(|&(_, w)| w).unwrap_or(0.0);

        selected
            .into_iter()
            .map(|(item_id, weight)| Candidate {
                item_id,
                recall_source: RecallSource::Popularity,
                base_score: if max_weight > 0.0 {
                    weight / max_weight
                } else {
                    0.0
                },
            })
            .collect()
    }

    fn source(&self) -> RecallSource {
        RecallSource::Popularity
    }
}
