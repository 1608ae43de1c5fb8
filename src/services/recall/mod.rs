mod cooccurrence;
mod popularity;

pub use cooccurrence::CoOccurrenceRecall;
pub use popularity::PopularityRecall;

use tracing::debug;

use crate::models::{Candidate, ItemId, RecallSource};

/// Recall 策略特徵：給定已解析的購物車，產出候選集
pub trait CandidateSource: Send + Sync {
    /// Returns at most `limit` candidates, base_score in [0,1], sorted by
    /// base_score descending with ascending item id as the tie-break, and
    /// never containing a cart item.
    fn generate(&self, cart: &[ItemId], limit: usize) -> Vec<Candidate>;
    fn source(&self) -> RecallSource;
}

/// Stage 1: 共現召回 + 熱門後備
///
/// Co-occurrence recall is the primary source. When the cart resolves to
/// nothing the index can work with (empty cart, out-of-vocabulary cart, or
/// items with no recorded neighbors), popularity recall takes over, so the
/// candidate set is only ever empty when the catalog itself is.
pub struct CandidateGenerator {
    cooccurrence: CoOccurrenceRecall,
    popularity: PopularityRecall,
    max_candidates: usize,
}

impl CandidateGenerator {
    pub fn new(
        cooccurrence: CoOccurrenceRecall,
        popularity: PopularityRecall,
        max_candidates: usize,
    ) -> Self {
        Self {
            cooccurrence,
            popularity,
            max_candidates,
        }
    }

    pub fn generate(&self, cart: &[ItemId]) -> Vec<Candidate> {
        if !cart.is_empty() {
            let candidates = self.cooccurrence.generate(cart, self.max_candidates);
            if !candidates.is_empty() {
                return candidates;
            }
            debug!(
                cart_len = cart.len(),
                "no co-occurrence signal for cart, falling back to popularity"
            );
        }

        self.popularity.generate(cart, self.max_candidates)
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}
