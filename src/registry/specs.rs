use std::collections::HashMap;

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Hardware ceiling for MIG partitioning across all supported SKUs.
pub const MAX_MIG_INSTANCES: u32 = 7;

/// One row of the spec registry. Read-only from process start to end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpuModelSpec {
    pub key: String,
    pub vram_gb: f64,
    pub tdp_watts: f64,
    /// Supported MIG partition count, 0 = unsupported.
    pub mig_support: u32,
    pub nvlink: bool,
    pub generation: String,
    pub cuda_cores: u32,
    pub slot_width: u32,
    pub pcie_generation: u32,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    models: Vec<GpuModelSpec>,
}

/// Immutable keyed lookup of canonical model -> technical specification.
/// Loaded once per run; insertion order is preserved because fuzzy
/// tie-breaking depends on it.
#[derive(Clone, Debug)]
pub struct SpecRegistry {
    entries: Vec<GpuModelSpec>,
    by_key: HashMap<String, usize>,
}

impl SpecRegistry {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path))
            .build()
            .with_context(|| format!("reading spec registry {path}"))?;

        let file: RegistryFile = cfg
            .try_deserialize()
            .context("deserializing spec registry")?;
        let registry = Self::from_entries(file.models)?;
        info!(models = registry.len(), "Spec registry loaded");
        Ok(registry)
    }

    /// Build from in-memory entries. A malformed or duplicate entry aborts
    /// the whole load; there is no partial registry.
    pub fn from_entries(entries: Vec<GpuModelSpec>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(entries.len());
        for (idx, spec) in entries.iter().enumerate() {
            anyhow::ensure!(
                !spec.key.trim().is_empty(),
                "registry entry {idx} has an empty key"
            );
            anyhow::ensure!(
                spec.vram_gb > 0.0,
                "registry entry {}: vram_gb must be > 0",
                spec.key
            );
            anyhow::ensure!(
                spec.tdp_watts > 0.0,
                "registry entry {}: tdp_watts must be > 0",
                spec.key
            );
            anyhow::ensure!(
                spec.mig_support <= MAX_MIG_INSTANCES,
                "registry entry {}: mig_support {} exceeds {}",
                spec.key,
                spec.mig_support,
                MAX_MIG_INSTANCES
            );
            anyhow::ensure!(
                by_key.insert(spec.key.clone(), idx).is_none(),
                "duplicate registry key {}",
                spec.key
            );
        }
        Ok(Self { entries, by_key })
    }

    pub fn lookup(&self, key: &str) -> Option<&GpuModelSpec> {
        self.by_key.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[GpuModelSpec] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
