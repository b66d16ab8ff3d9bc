use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a TOML file into `T`. Used by both binaries for their `--config` override file.
pub fn load_toml<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

    toml::from_str(&raw).with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
}
