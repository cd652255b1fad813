// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cmdeck_app::{DEFAULT_OUTPUT_CAPACITY, Tab};
use cmdeck_tui::Theme;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "cmdeck";
pub const CONFIG_PATH_ENV: &str = "CMDECK_CONFIG_PATH";
const CONFIG_VERSION: i64 = 1;
pub const DEFAULT_PROGRAM: &str = "cmdeck-target";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            target: Target::default(),
            ui: Ui::default(),
            output: Output::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    pub program: Option<String>,
    #[serde(default)]
    pub base_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub theme: Option<String>,
    pub start_tab: Option<Tab>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub capacity: Option<i64>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_OUTPUT_CAPACITY as i64),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = {CONFIG_VERSION}` at the top",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = {CONFIG_VERSION}",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(program) = &self.target.program
            && program.trim().is_empty()
        {
            bail!("target.program in {} must not be empty", path.display());
        }

        if let Some(theme) = &self.ui.theme
            && Theme::named(theme).is_none()
        {
            bail!(
                "ui.theme in {} must be one of {}, got {theme:?}",
                path.display(),
                Theme::NAMES.join(", ")
            );
        }

        if let Some(capacity) = self.output.capacity
            && capacity <= 0
        {
            bail!(
                "output.capacity in {} must be positive, got {}",
                path.display(),
                capacity
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level)
                .with_context(|| format!("log.level in {} is not a valid filter", path.display()))?;
        }

        Ok(())
    }

    pub fn program(&self) -> &str {
        self.target.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }

    pub fn base_args(&self) -> &[String] {
        &self.target.base_args
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.ui.theme.as_deref()
    }

    pub fn start_tab(&self) -> Tab {
        self.ui.start_tab.unwrap_or(Tab::Commands)
    }

    pub fn output_capacity(&self) -> usize {
        self.output
            .capacity
            .and_then(|capacity| usize::try_from(capacity).ok())
            .filter(|capacity| *capacity > 0)
            .unwrap_or(DEFAULT_OUTPUT_CAPACITY)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.path {
            return Ok(PathBuf::from(path));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve local data directory; set [log].path in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("cmdeck.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# cmdeck config\n# Place this file at: {}\n\nversion = {CONFIG_VERSION}\n\n[target]\n# Program each action runs; the action key and its values follow base_args.\nprogram = \"{DEFAULT_PROGRAM}\"\nbase_args = []\n\n[ui]\n# One of: {}\ntheme = \"default\"\n# One of: commands, output, help\nstart_tab = \"commands\"\n\n[output]\ncapacity = {DEFAULT_OUTPUT_CAPACITY}\n\n[log]\n# Overridden by CMDECK_LOG\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# path = \"/absolute/path/to/cmdeck.log\"\n",
            path.display(),
            Theme::NAMES.join(", "),
        )
    }
}
