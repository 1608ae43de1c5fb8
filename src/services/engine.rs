use std::collections::HashSet;

use tracing::{debug, info};

use crate::artifacts::{EngineArtifacts, ModelLoadError};
use crate::config::EngineConfig;
use crate::models::{Context, ItemId, Recommendation};
use crate::services::aggregator::Aggregator;
use crate::services::catalog::ItemCatalog;
use crate::services::context::ContextResolver;
use crate::services::ranking::{ContextualRanker, RankingLayer};
use crate::services::recall::{CandidateGenerator, CoOccurrenceRecall, PopularityRecall};

/// 兩階段推薦引擎：召回 → 排序 → 聚合
///
/// Constructed exactly once per process, before traffic is accepted, and
/// immutable afterwards. `recommend` reads only shared immutable state, so
/// a single instance behind an `Arc` serves any number of concurrent
/// callers without locks. A new model snapshot means a new process; there
/// is no hot reload.
///
/// Construction is the only fatal path: a snapshot that does not validate
/// never yields an engine. Every per-request degradation (unknown items,
/// out-of-vocabulary carts, odd context signals) is absorbed here and
/// resolved to a valid, possibly generic, recommendation list.
pub struct RecommendationEngine {
    catalog: ItemCatalog,
    generator: CandidateGenerator,
    ranking: RankingLayer,
    aggregator: Aggregator,
}

impl RecommendationEngine {
    pub fn new(
        artifacts: EngineArtifacts,
        config: &EngineConfig,
    ) -> Result<Self, ModelLoadError> {
        let catalog = ItemCatalog::from_artifact(&artifacts.catalog)?;
        let cooccurrence = CoOccurrenceRecall::from_artifact(&artifacts.cooccurrence, &catalog)?;
        let popularity = PopularityRecall::from_catalog(&catalog);
        let ranker = ContextualRanker::from_artifact(&artifacts.ranking_model, &catalog)?;

        let generator =
            CandidateGenerator::new(cooccurrence, popularity, config.max_candidates);
        let ranking = RankingLayer::new(Box::new(ranker));
        let aggregator = Aggregator::new(config.top_k);

        info!(
            items = catalog.len(),
            model_version = %ranking.model_version(),
            max_candidates = config.max_candidates,
            top_k = config.top_k,
            "recommendation engine ready"
        );

        Ok(Self {
            catalog,
            generator,
            ranking,
            aggregator,
        })
    }

    /// Rank complementary items for the given cart and context signals.
    ///
    /// Pure function of its arguments and the loaded snapshot: identical
    /// input produces identical output for the lifetime of the process.
    /// Never fails — degraded inputs degrade the result, not the call.
    pub fn recommend(
        &self,
        cart_items: &[String],
        user_segment: &str,
        hour_of_day: u32,
    ) -> Vec<Recommendation> {
        let resolved = self.resolve_cart(cart_items);
        let context = ContextResolver::resolve(hour_of_day, user_segment);

        debug!(
            cart_len = cart_items.len(),
            resolved_len = resolved.len(),
            time_of_day = context.time_of_day.as_str(),
            user_segment = context.user_segment.as_str(),
            "running recommendation pipeline"
        );

        let candidates = self.generator.generate(&resolved);
        let ranked = self.ranking.rank(candidates, &resolved, &context);
        self.aggregator.finalize(ranked, &self.catalog)
    }

    /// Resolve the raw cart to known item ids, preserving input order.
    /// Unknown names are dropped, duplicates collapse to one occurrence.
    fn resolve_cart(&self, cart_items: &[String]) -> Vec<ItemId> {
        let mut resolved = Vec::with_capacity(cart_items.len());
        let mut seen: HashSet<ItemId> = HashSet::new();

        for raw in cart_items {
            match self.catalog.resolve(raw) {
                Some(id) => {
                    if seen.insert(id) {
                        resolved.push(id);
                    }
                }
                None => {
                    debug!(item = %raw, "dropping unresolved cart item");
                }
            }
        }

        resolved
    }

    /// Context as the boundary layer will report it back to the client.
    pub fn resolve_context(&self, hour_of_day: u32, user_segment: &str) -> Context {
        ContextResolver::resolve(hour_of_day, user_segment)
    }

    pub fn model_version(&self) -> &str {
        self.ranking.model_version()
    }

    pub fn item_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn max_candidates(&self) -> usize {
        self.generator.max_candidates()
    }

    pub fn top_k(&self) -> usize {
        self.aggregator.top_k()
    }
}
