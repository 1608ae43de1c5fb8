mod contextual;

pub use contextual::ContextualRanker;

use crate::models::{Candidate, Context, ItemId, RankedCandidate};

/// Stage 2 打分特徵：對單一候選計算情境相關分數
///
/// Implementations must be pure: no I/O, no randomness, no dependence on
/// call order. Scores are clamped into [0,1] by the layer, so a scorer can
/// return raw multiplied values.
pub trait Scorer: Send + Sync {
    fn score(&self, candidate: &Candidate, cart: &[ItemId], context: &Context) -> f32;
    fn version(&self) -> &str;
}

/// Ranking Layer - 對候選集逐一打分
pub struct RankingLayer {
    scorer: Box<dyn Scorer>,
}

impl RankingLayer {
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        Self { scorer }
    }

    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        cart: &[ItemId],
        context: &Context,
    ) -> Vec<RankedCandidate> {
        candidates
            .into_iter()
            .map(|candidate| {
                let rank_score = self
                    .scorer
                    .score(&candidate, cart, context)
                    .clamp(0.0, 1.0);
                RankedCandidate {
                    item_id: candidate.item_id,
                    recall_source: candidate.recall_source,
                    base_score: candidate.base_score,
                    rank_score,
                }
            })
            .collect()
    }

    pub fn model_version(&self) -> &str {
        self.scorer.version()
    }
}
