// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CMDECK_LOG";

/// `CMDECK_LOG` wins over the configured level.
pub fn resolve_filter(env_value: Option<&str>, configured: &str) -> Result<EnvFilter> {
    if let Some(raw) = env_value.filter(|raw| !raw.trim().is_empty()) {
        return EnvFilter::try_new(raw).with_context(|| format!("parse {LOG_ENV}={raw:?}"));
    }
    EnvFilter::try_new(configured).with_context(|| format!("parse log level {configured:?}"))
}

/// Appends to `path`; the dashboard owns the terminal so nothing goes to stderr.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let env_value = std::env::var(LOG_ENV).ok();
    let filter = resolve_filter(env_value.as_deref(), level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|error| anyhow::anyhow!("install log subscriber: {error}"))?;
    Ok(())
}
