use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context as _;
use vlib_core::Settings;

pub const CONFIG_FILE: &str = "config.toml";

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("read config {}", path.display()));
        }
    };

    parse_settings(&content).with_context(|| format!("parse config {}", path.display()))
}

pub fn parse_settings(content: &str) -> anyhow::Result<Settings> {
    let mut settings: Settings = toml::from_str(content)?;
    settings.normalize();
    Ok(settings)
}

pub fn apply_overrides(mut settings: Settings, overrides: &Overrides) -> Settings {
    if let Some(base_url) = &overrides.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    settings.normalize();
    settings
}

pub fn render_settings(settings: &Settings) -> anyhow::Result<String> {
    toml::to_string(settings).context("serialize settings")
}
