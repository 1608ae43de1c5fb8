pub mod aggregator;
pub mod catalog;
pub mod context;
pub mod engine;
pub mod ranking;
pub mod recall;

pub use aggregator::Aggregator;
pub use catalog::ItemCatalog;
pub use context::ContextResolver;
pub use engine::RecommendationEngine;
pub use ranking::{ContextualRanker, RankingLayer, Scorer};
pub use recall::{CandidateGenerator, CandidateSource, CoOccurrenceRecall, PopularityRecall};
