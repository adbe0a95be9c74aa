use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use taskflow_core::time::parse_timezone;
use taskflow_core::{EngineConfig, ScoringWeights};

use crate::state::ensure_taskflow_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSection,
    pub scoring: ScoringWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// IANA zone used for day rollover and for reading/printing local times.
    pub timezone: String,
    pub default_minutes_per_day: i64,
    pub default_strategy: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            default_minutes_per_day: 480,
            default_strategy: "EDF".to_string(),
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let tz = parse_timezone(&self.engine.timezone).context("engine.timezone in config.toml")?;
        self.scoring.validate().context("[scoring] in config.toml")?;
        Ok(EngineConfig::default()
            .with_timezone(tz)
            .with_weights(self.scoring))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskflow_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
