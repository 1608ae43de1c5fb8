use serde::{Deserialize, Serialize};

/// Stable item identifier, fixed for the lifetime of a model snapshot.
pub type ItemId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub popularity_weight: f32,
    pub feature_vector: Option<Vec<f32>>,
}

/// Two-bucket time-of-day split. Coarse on purpose: the upstream model is
/// trained on the same two buckets, so finer granularity here would not
/// match any learned weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Lunch,
    Dinner,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Lunch => "Lunch",
            TimeOfDay::Dinner => "Dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserSegment {
    Premium,
    Standard,
    Unknown,
}

impl UserSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserSegment::Premium => "Premium",
            UserSegment::Standard => "Standard",
            UserSegment::Unknown => "Unknown",
        }
    }
}

/// Request context inferred from raw boundary signals. Always valid: raw
/// input that cannot be mapped falls back to a documented default instead
/// of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub time_of_day: TimeOfDay,
    pub user_segment: UserSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecallSource {
    CoOccurrence, // 共現召回
    Popularity,   // 熱門召回（cold start 後備）
}

impl RecallSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecallSource::CoOccurrence => "cooccurrence",
            RecallSource::Popularity => "popularity",
        }
    }
}

/// Stage 1 output: an item worth considering, with its recall score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item_id: ItemId,
    pub recall_source: RecallSource,
    pub base_score: f32,
}

/// Stage 2 output: the same candidate with its contextual rank score.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub item_id: ItemId,
    pub recall_source: RecallSource,
    pub base_score: f32,
    pub rank_score: f32,
}

/// Final wire-level recommendation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: String,
    pub score: f32,
}
