use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::types::RawListing;
use crate::engine::pipeline::PipelineRun;

/// Read a batch of listings from a JSON array file.
pub fn read_listings(path: &str) -> Result<Vec<RawListing>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading listings from {path}"))?;
    let listings: Vec<RawListing> =
        serde_json::from_str(&data).with_context(|| format!("parsing listings JSON in {path}"))?;
    Ok(listings)
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let body = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Persist each stage's artifact so intermediates can be inspected and
/// replayed independently of the terminal output.
pub fn write_artifacts(out_dir: &str, run: &PipelineRun, pretty: bool) -> Result<()> {
    let dir = Path::new(out_dir);
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {out_dir}"))?;

    write_json(&dir.join("decisions.json"), &run.decisions, pretty)?;
    write_json(&dir.join("enriched.json"), &run.enriched, pretty)?;
    write_json(&dir.join("tagged.json"), &run.tagged, pretty)?;
    write_json(&dir.join("scored.json"), &run.scored, pretty)?;
    Ok(())
}
