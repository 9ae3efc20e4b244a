//! Load `.pipegrep.toml` from the working directory (CLI only). The library takes a
//! [`PipelineConfig`] directly and never reads this file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::PipelineConfig;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct PipegrepToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    root: Option<String>,
    order: Option<String>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
}

impl PipegrepToml {
    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file; `Err` when it exists
/// but cannot be read or parsed.
pub fn load_pipegrep_toml(dir: &Path) -> Result<Option<PipegrepToml>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("{}", path.display()))?;
    parse_pipegrep_toml(&s)
        .with_context(|| format!("{}", path.display()))
        .map(Some)
}

pub fn parse_pipegrep_toml(s: &str) -> Result<PipegrepToml> {
    Ok(toml::from_str(s)?)
}

/// Overwrite config field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $config:expr, $sec_field:ident => $config_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $config.$config_field = v;
        }
    };
}

/// Apply file settings to `config` (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_config(file: &PipegrepToml, config: &mut PipelineConfig) -> Result<()> {
    let sec = &file.settings;
    if let Some(ref root) = sec.root {
        config.root = PathBuf::from(root);
    }
    if let Some(ref order) = sec.order {
        config.order = order.parse()?;
    }
    apply_file_opt!(sec, config, follow_links => follow_links);
    apply_file_opt!(sec, config, verbose => verbose);
    Ok(())
}
