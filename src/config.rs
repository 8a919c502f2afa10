use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::allele::classical_loci;

pub const DEFAULT_MIN_LENGTH: usize = 50;
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Settings for exon extraction. All keys are optional in the JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfig {
    pub min_length: usize,
    pub loci: Vec<String>,
    pub line_width: usize,
    pub top: Option<usize>,
    pub dat_md5: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            loci: classical_loci(),
            line_width: DEFAULT_LINE_WIDTH,
            top: None,
            dat_md5: None,
        }
    }
}

impl ExtractionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            bail!("minLength must be greater than zero");
        }
        if self.line_width == 0 {
            bail!("lineWidth must be greater than zero");
        }
        if self.loci.is_empty() {
            bail!("loci must list at least one gene");
        }
        if let Some(md5) = &self.dat_md5 {
            validate_md5(md5)?;
        }
        Ok(())
    }
}

fn validate_md5(md5: &str) -> Result<()> {
    if md5.len() != 32 || !md5.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid MD5 for 'datMd5': expected 32 hex characters, got '{md5}'");
    }
    Ok(())
}
