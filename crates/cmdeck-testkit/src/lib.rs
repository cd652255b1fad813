// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cmdeck_app::{OutputLine, SessionState};
use std::fs;
use std::path::PathBuf;

/// Argument vector that runs `script` through `/bin/sh`.
pub fn shell_argv(script: &str) -> Vec<String> {
    vec!["/bin/sh".to_owned(), "-c".to_owned(), script.to_owned()]
}

/// Shell script that prints each stdout line, then each stderr line, then exits.
pub fn emit_script(stdout: &[&str], stderr: &[&str], exit_code: i32) -> String {
    let mut parts = Vec::new();
    for line in stdout {
        parts.push(format!("printf '%s\\n' {}", shell_quote(line)));
    }
    for line in stderr {
        parts.push(format!("printf '%s\\n' {} >&2", shell_quote(line)));
    }
    parts.push(format!("exit {exit_code}"));
    parts.join("; ")
}

pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Session whose buffer holds `stdout` lines followed by `stderr` lines.
pub fn session_with_output(stdout: &[&str], stderr: &[&str]) -> SessionState {
    let mut session = SessionState::default();
    for line in stdout {
        session.push_line(OutputLine::stdout(*line));
    }
    for line in stderr {
        session.push_line(OutputLine::stderr(*line));
    }
    session
}

/// Temp dir holding `config.toml` with `content`; keep the dir alive while the path is used.
pub fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let temp = tempfile::tempdir().context("create temp dir")?;
    let path = temp.path().join("config.toml");
    fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok((temp, path))
}
