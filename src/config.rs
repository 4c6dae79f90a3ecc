use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::MAX_K;

/// Build configuration for `repmin from-config`.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub index: IndexSettings,
    pub sources: SourceList,
}

#[derive(Debug, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_k")]
    pub k: usize,
    pub window: usize,
    pub output: PathBuf,
    /// Write the index big-endian instead of the little-endian default.
    #[serde(default)]
    pub big_endian: bool,
}

fn default_k() -> usize {
    16
}

/// Repeat sequences to train on, one source id per FASTA/FASTQ record in
/// file order.
#[derive(Debug, Deserialize)]
pub struct SourceList {
    pub files: Vec<PathBuf>,
}

pub fn parse_config(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .context(format!("Failed to read config file: {}", path.display()))?;

    let config: ConfigFile = toml::from_str(&contents)
        .context("Failed to parse TOML config")?;

    if config.sources.files.is_empty() {
        return Err(anyhow!("Config must list at least one file in [sources].files"));
    }

    if config.index.k == 0 || config.index.k > MAX_K {
        return Err(anyhow!(
            "Config error: k must be in 1..={} (got {})",
            MAX_K,
            config.index.k
        ));
    }

    if config.index.window == 0 {
        return Err(anyhow!("Config error: window must be at least 1"));
    }

    Ok(config)
}

/// Check that every source file exists, resolving relative paths against
/// the config file's directory.
pub fn validate_config(config: &ConfigFile, config_dir: &Path) -> Result<()> {
    for file_path in &config.sources.files {
        let abs_path = resolve_path(config_dir, file_path);
        if !abs_path.exists() {
            return Err(anyhow!("Source file not found: {}", abs_path.display()));
        }
    }

    Ok(())
}

pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
