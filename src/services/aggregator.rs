use crate::models::{ItemId, RankedCandidate, Recommendation};
use crate::services::catalog::ItemCatalog;

/// Final merge of the two pipeline stages.
///
/// `final_score` is the arithmetic mean of base and rank score: equal trust
/// in the recall signal and the ranking signal. Sort is score descending
/// with ascending item id on ties, then the list is cut to `top_k` and ids
/// are mapped back to display names.
pub struct Aggregator {
    top_k: usize,
}

impl Aggregator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn finalize(
        &self,
        candidates: Vec<RankedCandidate>,
        catalog: &ItemCatalog,
    ) -> Vec<Recommendation> {
        let mut scored: Vec<(ItemId, f32)> = candidates
            .into_iter()
            .map(|c| (c.item_id, (c.base_score + c.rank_score) / 2.0))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(self.top_k);

        scored
            .into_iter()
            .filter_map(|(item_id, score)| {
                catalog.display_name(item_id).map(|name| Recommendation {
                    item: name.to_string(),
                    score,
                })
            })
            .collect()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{CatalogArtifact, CatalogItem};
    use crate::models::RecallSource;

    fn catalog(ids: &[ItemId]) -> ItemCatalog {
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

    fn ranked(item_id: ItemId, base_score: f32, rank_score: f32) -> RankedCandidate {
        RankedCandidate {
            item_id,
            recall_source: RecallSource::CoOccurrence,
            base_score,
            rank_score,
        }
    }

    #[test]
    fn test_final_score_is_arithmetic_mean() {
        let aggregator = Aggregator::new(5);
        let result = aggregator.finalize(vec![ranked(1, 0.8, 0.4)], &catalog(&[1]));

        assert_eq!(result.len(), 1);
        assert!((result[0].score - 0.6).abs() < 1e-6);
        assert_eq!(result[0].item, "Item 1");
    }

    #[test]
    fn test_sorted_descending_with_id_tie_break() {
        let aggregator = Aggregator::new(5);
        let result = aggregator.finalize(
            vec![
                ranked(9, 0.6, 0.6),
                ranked(2, 0.9, 0.9),
                ranked(4, 0.6, 0.6),
            ],
            &catalog(&[2, 4, 9]),
        );

        let items: Vec<&str> = result.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Item 2", "Item 4", "Item 9"]);
    }

    #[test]
    fn test_truncates_to_top_k() {
        let aggregator = Aggregator::new(2);
        let result = aggregator.finalize(
            vec![
                ranked(1, 0.9, 0.9),
                ranked(2, 0.8, 0.8),
                ranked(3, 0.7, 0.7),
            ],
            &catalog(&[1, 2, 3]),
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].item, "Item 1");
        assert_eq!(result[1].item, "Item 2");
    }

    #[test]
    fn test_fewer_candidates_than_k() {
        let aggregator = Aggregator::new(5);
        let result = aggregator.finalize(vec![ranked(1, 0.5, 0.5)], &catalog(&[1]));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let aggregator = Aggregator::new(5);
        assert!(aggregator.finalize(Vec::new(), &catalog(&[1])).is_empty());
    }
}
