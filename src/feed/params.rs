//! Last-used chart parameter persistence.
//!
//! One small record per (chain, product version) used only to decide what to
//! prefetch before the user picks a symbol. Last write wins; any read or
//! parse failure is a cache miss, never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::shared::{ChainId, ProductVersion, Resolution};

/// Last-used resolution and lookback for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvParams {
    pub resolution: Resolution,
    pub count_back: usize,
}

/// Persistence capability for `TvParams`.
pub trait ParamsStore: Send + Sync {
    fn load(&self, chain: ChainId, version: ProductVersion) -> Option<TvParams>;
    fn save(&self, chain: ChainId, version: ProductVersion, params: &TvParams);
}

// ─── FileParamsStore ─────────────────────────────────────────────────────────

/// File-backed store: one JSON file per (chain, version) under a directory.
#[derive(Debug, Clone)]
pub struct FileParamsStore {
    dir: PathBuf,
}

impl FileParamsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, chain: ChainId, version: ProductVersion) -> PathBuf {
        let suffix = match version {
            ProductVersion::V1 => "v1",
            ProductVersion::V2 => "v2",
        };
        self.dir.join(format!("tv_params_{}_{}.json", chain, suffix))
    }
}

impl ParamsStore for FileParamsStore {
    fn load(&self, chain: ChainId, version: ProductVersion) -> Option<TvParams> {
        let path = self.path_for(chain, version);
        let text = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(params) => Some(params),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Discarding malformed params cache");
                None
            }
        }
    }

    fn save(&self, chain: ChainId, version: ProductVersion, params: &TvParams) {
        let path = self.path_for(chain, version);
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), error = %e, "Params cache dir unavailable");
            return;
        }
        match serde_json::to_string(params) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::debug!(path = %path.display(), error = %e, "Params cache write failed");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Params cache serialization failed");
            }
        }
    }
}

// ─── MemoryParamsStore ───────────────────────────────────────────────────────

/// In-memory store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryParamsStore {
    inner: Mutex<HashMap<(ChainId, ProductVersion), TvParams>>,
}

impl MemoryParamsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParamsStore for MemoryParamsStore {
    fn load(&self, chain: ChainId, version: ProductVersion) -> Option<TvParams> {
        self.inner.lock().unwrap().get(&(chain, version)).copied()
    }

    fn save(&self, chain: ChainId, version: ProductVersion, params: &TvParams) {
        self.inner
            .lock()
            .unwrap()
            .insert((chain, version), *params);
    }
}
