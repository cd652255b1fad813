// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

/// One argument prompt an action collects before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Emitted as `<flag> <value>` when set; positional otherwise.
    pub flag: Option<&'static str>,
}

impl FieldSpec {
    pub const fn positional(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            flag: None,
        }
    }

    pub const fn optional_flag(name: &'static str, label: &'static str, flag: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            flag: Some(flag),
        }
    }

    pub fn validate(&self, value: &str) -> Result<()> {
        if self.required && value.trim().is_empty() {
            bail!("{} is required -- enter a value and retry", self.label);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub hint: &'static str,
    pub summary: &'static str,
    pub example: &'static str,
    pub cost_hint: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Action {
    /// Key under which the last value of `field` is remembered for prompt defaults.
    pub fn field_key(&self, field: &FieldSpec) -> String {
        format!("{}.{}", self.key, field.name)
    }
}

const SEARCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::positional("query", "search query"),
    FieldSpec::optional_flag("limit", "result limit", "--limit"),
];
const PROFILE_FIELDS: &[FieldSpec] = &[FieldSpec::positional("handle", "profile handle")];
const TRENDS_FIELDS: &[FieldSpec] = &[FieldSpec::optional_flag("window", "time window", "--window")];
const COMPARE_FIELDS: &[FieldSpec] = &[
    FieldSpec::positional("left", "left package"),
    FieldSpec::positional("right", "right package"),
];

pub const BUILTIN_ACTIONS: &[Action] = &[
    Action {
        key: "search",
        label: "Search",
        aliases: &["s", "find"],
        hint: "search <query> [--limit N]",
        summary: "Full-text search across the package index.",
        example: "search \"AI agents\" --limit 20",
        cost_hint: "1 request per page",
        fields: SEARCH_FIELDS,
    },
    Action {
        key: "profile",
        label: "Profile",
        aliases: &["p", "user"],
        hint: "profile <handle>",
        summary: "Show a maintainer profile with published packages.",
        example: "profile octocat",
        cost_hint: "2 requests",
        fields: PROFILE_FIELDS,
    },
    Action {
        key: "trends",
        label: "Trends",
        aliases: &["t", "trending"],
        hint: "trends [--window 7d]",
        summary: "Rank packages by recent download growth.",
        example: "trends --window 30d",
        cost_hint: "1 request, cached 10m",
        fields: TRENDS_FIELDS,
    },
    Action {
        key: "compare",
        label: "Compare",
        aliases: &["c", "diff"],
        hint: "compare <left> <right>",
        summary: "Side-by-side comparison of two packages.",
        example: "compare serde miniserde",
        cost_hint: "2 requests",
        fields: COMPARE_FIELDS,
    },
    Action {
        key: "costs",
        label: "Costs",
        aliases: &["$", "spend"],
        hint: "costs",
        summary: "Summarize request spend for the current billing period.",
        example: "costs",
        cost_hint: "free (local ledger)",
        fields: &[],
    },
    Action {
        key: "doctor",
        label: "Doctor",
        aliases: &["d", "check"],
        hint: "doctor",
        summary: "Check credentials, cache directory and service reachability.",
        example: "doctor",
        cost_hint: "1 request",
        fields: &[],
    },
];

pub fn builtin_catalog() -> &'static [Action] {
    BUILTIN_ACTIONS
}

pub fn find_action<'a>(catalog: &'a [Action], key: &str) -> Option<&'a Action> {
    catalog.iter().find(|action| action.key == key)
}
