//! Loading the JSON config file and applying `--set` overrides.
use std::path::Path;

use anyhow::{Context, Result};
use phrase_scatter::prelude::Config;

/// Read `path` as a JSON [`Config`], or start from the process default.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::global());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Split a `key=value` override.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

pub fn apply_overrides(config: &mut Config, overrides: &[(String, String)]) -> Result<()> {
    config
        .merge(overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .context("applying --set overrides")?;
    Ok(())
}
