//! Offline artifact snapshots.
//!
//! The catalog, the co-occurrence index and the ranking model are produced
//! by upstream batch jobs and shipped as read-only JSON files. They are read
//! exactly once, at process start, and never touched again while serving.
//! A new snapshot means a new process; there is no in-place reload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{ItemId, TimeOfDay, UserSegment};

pub const CATALOG_FILE: &str = "catalog.json";
pub const COOCCURRENCE_FILE: &str = "cooccurrence.json";
pub const RANKING_MODEL_FILE: &str = "ranking_model.json";

/// The only fatal error class in the service. Anything that goes wrong
/// here must keep the process from accepting traffic.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog contains no items")]
    EmptyCatalog,

    #[error("duplicate item id {0} in catalog")]
    DuplicateItemId(ItemId),

    #[error("alias {alias:?} maps to both item {first} and item {second}")]
    DuplicateAlias {
        alias: String,
        first: ItemId,
        second: ItemId,
    },

    #[error("item {item} has negative popularity weight {weight}")]
    NegativePopularity { item: ItemId, weight: f32 },

    #[error("co-occurrence index references unknown item {0}")]
    UnknownCoOccurrenceItem(ItemId),

    #[error("negative co-occurrence weight {weight} for pair ({item}, {neighbor})")]
    NegativeCoOccurrenceWeight {
        item: ItemId,
        neighbor: ItemId,
        weight: f32,
    },

    #[error("ranking model references unknown item {0}")]
    UnknownModelItem(ItemId),

    #[error("ranking model has negative multiplier {multiplier} for item {item}")]
    NegativeMultiplier { item: ItemId, multiplier: f32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtifact {
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub popularity_weight: f32,
    #[serde(default)]
    pub feature_vector: Option<Vec<f32>>,
}

/// Item id -> neighbor list, each neighbor carrying the co-purchase weight
/// computed offline. Neighbor lists are re-sorted at load so serving never
/// depends on the file order.
#[derive(Debug, Clone, Deserialize)]
pub struct CoOccurrenceArtifact {
    pub pairs: HashMap<ItemId, Vec<(ItemId, f32)>>,
}

/// Contextual reweighting tables. Missing (context, item) entries mean
/// "no learned signal" and score as a 1.0 multiplier, never as zero.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingModelArtifact {
    pub version: String,
    #[serde(default)]
    pub segment_multipliers: HashMap<UserSegment, HashMap<ItemId, f32>>,
    #[serde(default)]
    pub time_multipliers: HashMap<TimeOfDay, HashMap<ItemId, f32>>,
}

/// Everything the engine needs, loaded wholesale.
#[derive(Debug, Clone)]
pub struct EngineArtifacts {
    pub catalog: CatalogArtifact,
    pub cooccurrence: CoOccurrenceArtifact,
    pub ranking_model: RankingModelArtifact,
}

impl EngineArtifacts {
    /// Read the three snapshot files from `dir`. Missing or malformed
    /// files are fatal; cross-file consistency is checked by the engine
    /// constructor, which owns the derived lookup structures.
    pub fn load(dir: &Path) -> Result<Self, ModelLoadError> {
        let catalog: CatalogArtifact = read_json(&dir.join(CATALOG_FILE))?;
        let cooccurrence: CoOccurrenceArtifact = read_json(&dir.join(COOCCURRENCE_FILE))?;
        let ranking_model: RankingModelArtifact = read_json(&dir.join(RANKING_MODEL_FILE))?;

        info!(
            items = catalog.items.len(),
            cooccurrence_entries = cooccurrence.pairs.len(),
            model_version = %ranking_model.version,
            "artifact snapshot loaded"
        );

        Ok(Self {
            catalog,
            cooccurrence,
            ranking_model,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn write_valid_artifacts(dir: &Path) {
        write_file(
            dir,
            CATALOG_FILE,
            r#"{"items": [
                {"id": 1, "name": "Butter Chicken", "aliases": ["murgh makhani"], "popularity_weight": 0.9},
                {"id": 2, "name": "Garlic Naan", "popularity_weight": 0.8}
            ]}"#,
        );
        write_file(
            dir,
            COOCCURRENCE_FILE,
            r#"{"pairs": {"1": [[2, 12.0]], "2": [[1, 12.0]]}}"#,
        );
        write_file(
            dir,
            RANKING_MODEL_FILE,
            r#"{
                "version": "test-1",
                "segment_multipliers": {"Premium": {"2": 1.2}},
                "time_multipliers": {"Lunch": {"1": 0.9}}
            }"#,
        );
    }

    #[test]
    fn test_load_valid_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());

        let artifacts = EngineArtifacts::load(dir.path()).unwrap();

        assert_eq!(artifacts.catalog.items.len(), 2);
        assert_eq!(artifacts.cooccurrence.pairs.len(), 2);
        assert_eq!(artifacts.ranking_model.version, "test-1");
        assert_eq!(
            artifacts.ranking_model.segment_multipliers[&UserSegment::Premium][&2],
            1.2
        );
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        fs::remove_file(dir.path().join(RANKING_MODEL_FILE)).unwrap();

        let err = EngineArtifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        write_file(dir.path(), COOCCURRENCE_FILE, "{not json");

        let err = EngineArtifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Parse { .. }));
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let dir = tempfile::tempdir().unwrap();
        write_valid_artifacts(dir.path());
        write_file(dir.path(), RANKING_MODEL_FILE, r#"{"version": "bare"}"#);

        let artifacts = EngineArtifacts::load(dir.path()).unwrap();
        assert!(artifacts.ranking_model.segment_multipliers.is_empty());
        assert!(artifacts.ranking_model.time_multipliers.is_empty());
    }
}
