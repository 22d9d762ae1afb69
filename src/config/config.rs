use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;

use crate::engine::matcher::MatcherCfg;
use crate::engine::quantization::QuantizationCfg;
use crate::engine::scoring::ScoringCfg;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub registry: RegistryCfg,
    #[serde(default)]
    pub matcher: MatcherCfg,
    #[serde(default)]
    pub scoring: ScoringCfg,
    #[serde(default)]
    pub heuristics: HeuristicsCfg,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryCfg {
    #[serde(default = "default_registry_path")]
    pub path: String,
}

fn default_registry_path() -> String {
    "registry.yml".to_string()
}

impl Default for RegistryCfg {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

/// Per-heuristic configuration, one block per heuristic so each stays
/// independently loadable and testable.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HeuristicsCfg {
    #[serde(default)]
    pub quantization: QuantizationCfg,
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    /// Fails fast, before any record is processed.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.registry.path.is_empty(), "registry.path missing");
        anyhow::ensure!(
            self.matcher.fuzzy_threshold > 0.0 && self.matcher.fuzzy_threshold <= 1.0,
            "matcher.fuzzy_threshold must be in (0, 1]"
        );

        let weights = &self.scoring.weights;
        for (name, value) in [
            ("vram", weights.vram),
            ("mig", weights.mig),
            ("nvlink", weights.nvlink),
            ("tdp", weights.tdp),
            ("price", weights.price),
        ] {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "scoring.weights.{name} must be finite and >= 0"
            );
        }

        let maxima = &self.scoring.maxima;
        anyhow::ensure!(maxima.vram_gb > 0.0, "scoring.maxima.vram_gb must be > 0");
        anyhow::ensure!(maxima.mig > 0, "scoring.maxima.mig must be > 0");
        anyhow::ensure!(maxima.tdp_watts > 0.0, "scoring.maxima.tdp_watts must be > 0");
        anyhow::ensure!(maxima.price > 0.0, "scoring.maxima.price must be > 0");

        let quant = &self.heuristics.quantization;
        anyhow::ensure!(
            quant.min_vram_gb > 0.0,
            "heuristics.quantization.min_vram_gb must be > 0"
        );
        anyhow::ensure!(
            quant.max_tdp_watts > 0.0,
            "heuristics.quantization.max_tdp_watts must be > 0"
        );
        anyhow::ensure!(
            quant.target_model_vram_gb > 0.0,
            "heuristics.quantization.target_model_vram_gb must be > 0"
        );
        anyhow::ensure!(
            quant.runtime_overhead_gb >= 0.0,
            "heuristics.quantization.runtime_overhead_gb must be >= 0"
        );
        anyhow::ensure!(
            quant.saturation_headroom_gb > 0.0,
            "heuristics.quantization.saturation_headroom_gb must be > 0"
        );
        Ok(())
    }
}
