pub mod enrich;
pub mod fuzzy;
pub mod heuristics;
pub mod matcher;
pub mod normalizers;
pub mod patterns;
pub mod pipeline;
pub mod quantization;
pub mod rejects;
pub mod scoring;
pub mod types;
