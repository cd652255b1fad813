// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DashboardRuntime, FieldValue, runner};
use anyhow::{Context, Result};
use cmdeck_app::{Action, SessionState, best_match, normalize};
use std::io::{BufRead, Write};
use time::OffsetDateTime;

const RULE_MAX_COLUMNS: usize = 72;
const MENU_FOOTER: &str = "number, name, or alias; q to quit";

/// Menu-driven session over plain lines, for pipes and dumb terminals.
///
/// Ends on EOF or `q`. Each chosen action prompts for its fields one line at a
/// time, then streams the child's output straight to `out`.
pub fn run_line_mode<R, I, O>(
    session: &mut SessionState,
    runtime: &mut R,
    catalog: &[Action],
    input: &mut I,
    out: &mut O,
    width: usize,
) -> Result<()>
where
    R: DashboardRuntime,
    I: BufRead,
    O: Write,
{
    loop {
        write_menu(out, catalog, width)?;
        write!(out, "> ").context("write prompt")?;
        out.flush().context("flush prompt")?;

        let Some(choice) = read_line(input)? else {
            return Ok(());
        };
        let choice = choice.trim();
        if choice.is_empty() {
            continue;
        }
        if matches!(choice, "q" | "quit") {
            return Ok(());
        }

        let Some(action) = resolve_choice(catalog, choice) else {
            writeln!(out, "no action matches {choice:?}").context("write output")?;
            continue;
        };

        let values = match collect_fields(session, action, input, out)? {
            Fields::Collected(values) => values,
            Fields::Invalid => continue,
            Fields::Eof => return Ok(()),
        };

        let plan = match runtime.build_plan(action, &values) {
            Ok(plan) => plan,
            Err(error) => {
                session.fail(format!("{error:#}"));
                writeln!(out, "{}", session.last_status).context("write output")?;
                continue;
            }
        };

        session.begin_run(&plan.command_line);
        writeln!(out, "$ {}", plan.command_line).context("write output")?;
        tracing::info!(command = %plan.command_line, "line mode run started");

        let mut write_error = None;
        let result = runner::run_streaming(&plan.argv, |line| {
            if write_error.is_none() {
                write_error = writeln!(out, "{}", line.tagged()).err();
            }
            session.push_line(line);
        });
        if let Some(error) = write_error {
            return Err(error).context("write output");
        }

        match result {
            Ok(status) => session.finish_run(status, OffsetDateTime::now_utc()),
            Err(error) => session.fail(format!("{error:#}")),
        }
        writeln!(out, "{}", session.last_status).context("write output")?;
    }
}

fn write_menu<O: Write>(out: &mut O, catalog: &[Action], width: usize) -> Result<()> {
    let rule_width = width.clamp(1, RULE_MAX_COLUMNS);
    writeln!(out, "{}", "-".repeat(rule_width)).context("write menu")?;
    for (index, action) in catalog.iter().enumerate() {
        let row = format!("{:>2}. {:<10} {}", index + 1, action.label, action.hint);
        writeln!(out, "{}", row.chars().take(width.max(1)).collect::<String>())
            .context("write menu")?;
    }
    writeln!(out, "{MENU_FOOTER}").context("write menu")?;
    Ok(())
}

fn resolve_choice<'a>(catalog: &'a [Action], choice: &str) -> Option<&'a Action> {
    if let Some(key) = normalize(catalog, choice) {
        return catalog.iter().find(|action| action.key == key);
    }
    if let Ok(number) = choice.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| catalog.get(index));
    }
    best_match(catalog, choice)
}

enum Fields {
    Collected(Vec<FieldValue>),
    Invalid,
    Eof,
}

fn collect_fields<I: BufRead, O: Write>(
    session: &mut SessionState,
    action: &Action,
    input: &mut I,
    out: &mut O,
) -> Result<Fields> {
    let mut values = Vec::with_capacity(action.fields.len());
    for field in action.fields {
        let field_key = action.field_key(field);
        let default = session.remembered(&field_key).to_owned();
        let prompt = if default.is_empty() {
            format!("{}: ", field.label)
        } else {
            format!("{} [{default}]: ", field.label)
        };
        write!(out, "{prompt}").context("write prompt")?;
        out.flush().context("flush prompt")?;

        let Some(line) = read_line(input)? else {
            return Ok(Fields::Eof);
        };
        let value = match line.trim() {
            "" => default,
            typed => typed.to_owned(),
        };
        if let Err(error) = field.validate(&value) {
            session.fail(error);
            writeln!(out, "{}", session.last_status).context("write output")?;
            return Ok(Fields::Invalid);
        }
        session.remember(field_key, &value);
        values.push(FieldValue {
            field: *field,
            value,
        });
    }
    Ok(Fields::Collected(values))
}

/// Invalid UTF-8 is replaced rather than ending the session.
fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut raw = Vec::new();
    let read = input.read_until(b'\n', &mut raw).context("read input line")?;
    if read == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&raw);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}
