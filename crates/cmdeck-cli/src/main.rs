// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use cmdeck_app::{SessionState, UiState};
use cmdeck_tui::{DashboardOptions, Theme};
use config::Config;
use runtime::TargetRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cmdeck --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        println!(
            "config ok: {} (target {})",
            options.config_path.display(),
            config.program()
        );
        return Ok(());
    }

    match config.log_path() {
        Ok(log_path) => {
            if let Err(error) = logging::init(&log_path, config.log_level()) {
                eprintln!("logging disabled: {error:#}");
            }
        }
        Err(error) => eprintln!("logging disabled: {error:#}"),
    }
    tracing::info!(
        config = %options.config_path.display(),
        program = config.program(),
        plain = options.plain,
        "cmdeck starting"
    );

    let mut ui = UiState {
        tab: config.start_tab(),
        ..UiState::default()
    };
    let mut session = SessionState::with_capacity(config.output_capacity());
    let mut runtime = TargetRuntime::new(config.program(), config.base_args());
    let dashboard_options = DashboardOptions {
        catalog: cmdeck_app::builtin_catalog(),
        theme: Theme::from_env(config.theme_name()),
        plain: options.plain,
    };

    let result = cmdeck_tui::run_dashboard(&mut ui, &mut session, &mut runtime, &dashboard_options);
    if let Err(error) = &result {
        tracing::error!(error = %format!("{error:#}"), "dashboard exited with error");
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    plain: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        plain: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--plain" => {
                options.plain = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("cmdeck - terminal dashboard for a command-line target");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and exit");
    println!("  --plain                  Line-based menu instead of the dashboard");
    println!("  --help                   Show this help");
    println!();
    println!("Environment: {} (config path), CMDECK_THEME, {}", config::CONFIG_PATH_ENV, logging::LOG_ENV);
}
