//! 可选的 TOML 配置文件。命令行参数优先于文件中的取值。

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::fasta::{check_wrap_width, CaseMode};
use crate::pipeline::PipelineConfig;
use crate::transform::{DuplicatePolicy, StrandStyle};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub case: Option<CaseMode>,
    /// 保留有符号整数，负值在 [`Config::to_pipeline`] 中报错
    pub wrap: Option<i64>,
    pub duplicates: Option<DuplicatePolicy>,
    pub strand: Option<StrandStyle>,
    pub stats: Option<bool>,
    pub plots_dir: Option<PathBuf>,
    pub strict: Option<bool>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// 文件中未给出的项取默认值
    pub fn to_pipeline(&self) -> Result<PipelineConfig> {
        let defaults = PipelineConfig::default();
        Ok(PipelineConfig {
            case: self.case.unwrap_or(defaults.case),
            wrap: match self.wrap {
                Some(w) => check_wrap_width(w)?,
                None => defaults.wrap,
            },
            duplicates: self.duplicates.or(defaults.duplicates),
            strand: self.strand.or(defaults.strand),
            stats: self.stats.unwrap_or(defaults.stats),
            plots_dir: self.plots_dir.clone().or(defaults.plots_dir),
            strict: self.strict.unwrap_or(defaults.strict),
        })
    }

    pub fn generate_sample() -> &'static str {
        r#"# fastakit.toml - settings for `fastakit process`
# Command line arguments override these settings

# Residue case in the written FASTA: original, upper, lower
case = "original"

# Residues per output line, 0 writes each sequence on a single line
wrap = 60

# Duplicate identifiers: remove (keep first) or rename (X.1, X.2, ...)
# duplicates = "rename"

# Strand transformation: reverse, complement, reverse-complement
# strand = "reverse-complement"

# Write <stem>_stats.csv next to the output
stats = true

# Render length histogram and base-percentage box plot into this directory
# plots_dir = "plots"

# Fail on sequence lines found before the first header
strict = false
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let cfg: Config = toml::from_str(Config::generate_sample()).unwrap();
        assert_eq!(cfg.case, Some(CaseMode::Original));
        assert_eq!(cfg.wrap, Some(60));
        assert_eq!(cfg.stats, Some(true));
        assert_eq!(cfg.duplicates, None);
        let p = cfg.to_pipeline().unwrap();
        assert_eq!(p.wrap, 60);
        assert!(p.stats);
    }

    #[test]
    fn kebab_case_values() {
        let cfg: Config =
            toml::from_str("strand = \"reverse-complement\"\nduplicates = \"remove\"\ncase = \"upper\"\n")
                .unwrap();
        assert_eq!(cfg.strand, Some(StrandStyle::ReverseComplement));
        assert_eq!(cfg.duplicates, Some(DuplicatePolicy::Remove));
        assert_eq!(cfg.case, Some(CaseMode::Upper));
    }

    #[test]
    fn negative_wrap_rejected() {
        let cfg: Config = toml::from_str("wrap = -4\n").unwrap();
        assert!(matches!(cfg.to_pipeline(), Err(Error::Validation(_))));
    }

    #[test]
    fn unknown_key_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.to_pipeline().unwrap(), PipelineConfig::default());
    }
}
