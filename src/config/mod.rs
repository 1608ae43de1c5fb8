use std::env;
use std::path::PathBuf;

use anyhow::{ensure, Context as _};

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub artifacts: ArtifactConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Directory holding catalog.json, cooccurrence.json, ranking_model.json.
    pub dir: PathBuf,
}

/// Knobs of the serving pipeline. `max_candidates` (M) bounds the Stage 1
/// pool, `top_k` (K) the final list; M must exceed K so the re-rank has
/// headroom to reorder.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_candidates: usize,
    pub top_k: usize,
}

impl EngineConfig {
    pub fn new(max_candidates: usize, top_k: usize) -> Self {
        Self {
            max_candidates,
            top_k,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let http_port: u16 = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("HTTP_PORT must be a valid u16")?;
        let service_name = env::var("SERVICE_NAME")
            .unwrap_or_else(|_| "cart-recommendation-service".to_string());

        let artifact_dir = PathBuf::from(
            env::var("ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()),
        );

        let max_candidates: usize = env::var("MAX_CANDIDATES")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .context("MAX_CANDIDATES must be a valid usize")?;
        let top_k: usize = env::var("TOP_K")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("TOP_K must be a valid usize")?;
        ensure!(
            max_candidates > top_k,
            "MAX_CANDIDATES ({max_candidates}) must be greater than TOP_K ({top_k})"
        );

        Ok(Config {
            service: ServiceConfig {
                http_port,
                service_name,
            },
            artifacts: ArtifactConfig { dir: artifact_dir },
            engine: EngineConfig {
                max_candidates,
                top_k,
            },
        })
    }
}
