//! Conversion configuration stored in `converter.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Top-level conversion configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible MVP values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    pub llm: LlmConfig,

    /// Bound on search depth.
    pub max_iterations: u32,
    /// Bound on children per node.
    pub max_children: u32,

    /// Base directory for per-attempt sandbox workspaces.
    pub workspace_base_dir: std::path::PathBuf,
    /// Directory holding few-shot prompt exemplar files.
    pub prompt_exemplars_dir: std::path::PathBuf,

    pub sandbox: SandboxLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SandboxLimits {
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: String::new(),
            deployment: String::new(),
        }
    }
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            output_limit_bytes: 200_000,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            max_iterations: 3,
            max_children: 3,
            workspace_base_dir: std::env::temp_dir(),
            prompt_exemplars_dir: std::path::PathBuf::from("prompts"),
            sandbox: SandboxLimits::default(),
        }
    }
}

impl ConverterConfig {
    /// `max_iterations` and `max_children` of 0 are valid: they bound the
    /// search to the root attempt only.
    pub fn validate(&self) -> Result<()> {
        if self.sandbox.output_limit_bytes == 0 {
            return Err(anyhow!("sandbox.output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ConverterConfig::default()`.
pub fn load_config(path: &Path) -> Result<ConverterConfig> {
    if !path.exists() {
        let cfg = ConverterConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ConverterConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ConverterConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ConverterConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("converter.toml");
        let mut cfg = ConverterConfig::default();
        cfg.max_iterations = 5;
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn accepts_zero_max_children_and_max_iterations() {
        let mut cfg = ConverterConfig::default();
        cfg.max_children = 0;
        cfg.max_iterations = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_output_limit() {
        let mut cfg = ConverterConfig::default();
        cfg.sandbox.output_limit_bytes = 0;
        assert!(cfg.validate().is_err());
    }
}
