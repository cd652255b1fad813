// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Action;

const EXACT_KEY: u32 = 100;
const EXACT_LABEL: u32 = 90;
const EXACT_ALIAS: u32 = 80;
const LABEL_PREFIX: u32 = 70;
const ALIAS_PREFIX: u32 = 60;
const LABEL_SUBSTRING: u32 = 40;
const HINT_SUBSTRING: u32 = 20;

/// Resolves typed input to an action key by exact key or alias, ignoring case.
pub fn normalize(catalog: &[Action], raw: &str) -> Option<&'static str> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    catalog
        .iter()
        .find(|action| {
            action.key.to_lowercase() == needle
                || action
                    .aliases
                    .iter()
                    .any(|alias| alias.to_lowercase() == needle)
        })
        .map(|action| action.key)
}

/// Sums every matching signal; weights descend with specificity.
pub fn score(action: &Action, query: &str) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let key = action.key.to_lowercase();
    let label = action.label.to_lowercase();
    let hint = action.hint.to_lowercase();
    let aliases = action
        .aliases
        .iter()
        .map(|alias| alias.to_lowercase())
        .collect::<Vec<_>>();

    let mut total = 0;
    if key == query {
        total += EXACT_KEY;
    }
    if label == query {
        total += EXACT_LABEL;
    }
    if aliases.iter().any(|alias| *alias == query) {
        total += EXACT_ALIAS;
    }
    if label.starts_with(&query) {
        total += LABEL_PREFIX;
    }
    if aliases.iter().any(|alias| alias.starts_with(&query)) {
        total += ALIAS_PREFIX;
    }
    if label.contains(&query) {
        total += LABEL_SUBSTRING;
    }
    if hint.contains(&query) {
        total += HINT_SUBSTRING;
    }
    total
}

pub fn best_match<'a>(catalog: &'a [Action], query: &str) -> Option<&'a Action> {
    let mut best: Option<(&Action, u32)> = None;
    for action in catalog {
        let value = score(action, query);
        if value == 0 {
            continue;
        }
        match best {
            Some((_, current)) if current >= value => {}
            _ => best = Some((action, value)),
        }
    }
    best.map(|(action, _)| action)
}

/// Position of the best match, for moving the menu cursor.
pub fn best_match_index(catalog: &[Action], query: &str) -> Option<usize> {
    let action = best_match(catalog, query)?;
    catalog.iter().position(|candidate| candidate.key == action.key)
}
