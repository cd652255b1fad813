// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use cmdeck_app::Action;
use cmdeck_tui::{ExecutionPlan, FieldValue};

/// Builds `program base_args.. <action> <values..>` for the configured target.
pub struct TargetRuntime {
    program: String,
    base_args: Vec<String>,
}

impl TargetRuntime {
    pub fn new(program: impl Into<String>, base_args: &[String]) -> Self {
        Self {
            program: program.into(),
            base_args: base_args.to_vec(),
        }
    }
}

impl cmdeck_tui::DashboardRuntime for TargetRuntime {
    fn build_plan(&mut self, action: &Action, values: &[FieldValue]) -> Result<ExecutionPlan> {
        let mut argv = Vec::with_capacity(2 + self.base_args.len() + values.len() * 2);
        argv.push(self.program.clone());
        argv.extend(self.base_args.iter().cloned());
        argv.push(action.key.to_owned());

        for FieldValue { field, value } in values {
            field.validate(value)?;
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some(flag) = field.flag {
                argv.push(flag.to_owned());
            }
            argv.push(value.to_owned());
        }

        Ok(ExecutionPlan {
            command_line: display_command(&argv),
            argv,
        })
    }
}

fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.chars().any(|ch| ch.is_whitespace() || ch == '"') {
                format!("{arg:?}")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
