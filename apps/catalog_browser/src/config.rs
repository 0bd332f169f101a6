use std::{fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_ms: 5000,
            page_size: 12,
        }
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub page_size: Option<u32>,
}

pub fn load_settings(config_path: &Path, overrides: &Overrides) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        let file_cfg = toml::from_str::<toml::Table>(&raw)
            .with_context(|| format!("failed to parse '{}'", config_path.display()))?;
        apply_file(&mut settings, &file_cfg)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;

    if let Some(v) = &overrides.api_base_url {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = overrides.request_timeout_ms {
        settings.request_timeout_ms = v;
    }
    if let Some(v) = overrides.page_size {
        settings.page_size = v;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    validate(&settings)?;
    Ok(settings)
}

/// Values may be written as strings or bare integers.
fn file_value(file_cfg: &toml::Table, key: &str) -> anyhow::Result<Option<String>> {
    match file_cfg.get(key) {
        None => Ok(None),
        Some(toml::Value::String(v)) => Ok(Some(v.clone())),
        Some(toml::Value::Integer(v)) => Ok(Some(v.to_string())),
        Some(other) => bail!("unsupported value for {key}: {other}"),
    }
}

fn apply_file(settings: &mut Settings, file_cfg: &toml::Table) -> anyhow::Result<()> {
    if let Some(v) = file_value(file_cfg, "api_base_url")? {
        settings.api_base_url = v;
    }
    if let Some(v) = file_value(file_cfg, "request_timeout_ms")? {
        settings.request_timeout_ms = parse_number("request_timeout_ms", &v)?;
    }
    if let Some(v) = file_value(file_cfg, "page_size")? {
        settings.page_size = parse_number("page_size", &v)?;
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("CATALOG_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout_ms = parse_number("APP__REQUEST_TIMEOUT_MS", &v)?;
    }

    if let Some(v) = var("APP__PAGE_SIZE") {
        settings.page_size = parse_number("APP__PAGE_SIZE", &v)?;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid value '{raw}' for {key}: {e}"))
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.request_timeout_ms == 0 {
        bail!("request timeout must be greater than zero");
    }
    if settings.page_size == 0 {
        bail!("page size must be greater than zero");
    }
    Ok(())
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let url = Url::parse(trimmed).with_context(|| format!("invalid api base url '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("api base url must use http or https, got '{}'", url.scheme());
    }
    if url.cannot_be_a_base() {
        bail!("api base url '{trimmed}' cannot carry a path");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
