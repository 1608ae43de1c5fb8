use std::collections::HashMap;

use super::Scorer;
use crate::artifacts::{ModelLoadError, RankingModelArtifact};
use crate::models::{Candidate, Context, ItemId, TimeOfDay, UserSegment};
use crate::services::catalog::ItemCatalog;

/// Multiplicative contextual reweighting over the Stage 1 score.
///
/// `rank_score = base_score × segment_multiplier × time_multiplier`, each
/// multiplier looked up per (context category, item) in tables shipped with
/// the model snapshot. A missing entry is a 1.0 multiplier: absence of a
/// learned weight never zeroes a candidate. Both lookups are O(1), which
/// keeps a full pass over M candidates inside the latency budget.
#[derive(Debug)]
pub struct ContextualRanker {
    version: String,
    segment_multipliers: HashMap<UserSegment, HashMap<ItemId, f32>>,
    time_multipliers: HashMap<TimeOfDay, HashMap<ItemId, f32>>,
}

impl ContextualRanker {
    pub fn from_artifact(
        artifact: &RankingModelArtifact,
        catalog: &ItemCatalog,
    ) -> Result<Self, ModelLoadError> {
        for table in artifact
            .segment_multipliers
            .values()
            .chain(artifact.time_multipliers.values())
        {
            for (&item, &multiplier) in table {
                if !catalog.contains(item) {
                    return Err(ModelLoadError::UnknownModelItem(item));
                }
                if multiplier < 0.0 {
                    return Err(ModelLoadError::NegativeMultiplier { item, multiplier });
                }
            }
        }

        Ok(Self {
            version: artifact.version.clone(),
            segment_multipliers: artifact.segment_multipliers.clone(),
            time_multipliers: artifact.time_multipliers.clone(),
        })
    }

    fn segment_multiplier(&self, segment: UserSegment, item: ItemId) -> f32 {
        self.segment_multipliers
            .get(&segment)
            .and_then(|table| table.get(&item))
            .copied()
            .unwrap_or(1.0)
    }

    fn time_multiplier(&self, time_of_day: TimeOfDay, item: ItemId) -> f32 {
        self.time_multipliers
            .get(&time_of_day)
            .and_then(|table| table.get(&item))
            .copied()
            .unwrap_or(1.0)
    }
}

impl Scorer for ContextualRanker {
    fn score(&self, candidate: &Candidate, _cart: &[ItemId], context: &Context) -> f32 {
        candidate.base_score
            * self.segment_multiplier(context.user_segment, candidate.item_id)
            * self.time_multiplier(context.time_of_day, candidate.item_id)
    }

    fn version(&self) -> &str {
        &self.version
    }
}
