//! Configuration loading from sysconst.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::consts::ExtractOptions;

/// Name of the optional configuration file in the working root.
pub const CONFIG_FILE: &str = "sysconst.toml";

/// Main configuration structure for sysconst.toml.
#[derive(Debug, Deserialize, Default)]
pub struct SysconstConfig {
    /// Syscall naming conventions.
    pub extract: Option<ExtractConfig>,
    /// Constant file locations.
    pub consts: Option<ConstsConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Overrides for [`ExtractOptions`].
#[derive(Debug, Deserialize, Default)]
pub struct ExtractConfig {
    /// Prefix marking syscall-number constants, e.g. "__NR_" or "SYS_".
    pub nr_prefix: Option<String>,
    /// Prefix of pseudo-syscalls that have no number.
    pub pseudo_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConstsConfig {
    /// Glob matching the per-target constant files.
    pub glob: Option<String>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl SysconstConfig {
    /// Extraction options with any configured overrides applied.
    pub fn extract_options(&self) -> ExtractOptions {
        let mut opts = ExtractOptions::default();
        if let Some(extract) = &self.extract {
            if let Some(prefix) = &extract.nr_prefix {
                opts.nr_prefix = prefix.clone();
            }
            if let Some(prefix) = &extract.pseudo_prefix {
                opts.pseudo_prefix = prefix.clone();
            }
        }
        opts
    }

    pub fn const_glob(&self) -> Option<&str> {
        self.consts.as_ref()?.glob.as_deref()
    }

    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from sysconst.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<SysconstConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid sysconst.toml")?;
    Ok(Some(cfg))
}
