// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;

pub const DEFAULT_OUTPUT_CAPACITY: usize = 1200;
const STDERR_TAG: &str = "[stderr]";
const ESC: char = '\u{1b}';
const BEL: char = '\u{7}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

impl OutputLine {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stderr,
            text: text.into(),
        }
    }

    /// Text with the stream marker, as shown in plain (non-TUI) output.
    pub fn tagged(&self) -> String {
        match self.stream {
            Stream::Stdout => self.text.clone(),
            Stream::Stderr => format!("{STDERR_TAG} {}", self.text),
        }
    }
}

/// Ring of the most recent output lines; the oldest line is evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: VecDeque<OutputLine>,
    capacity: usize,
    evicted: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_CAPACITY)
    }
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_OUTPUT_CAPACITY)),
            capacity,
            evicted: 0,
        }
    }

    pub fn push(&mut self, line: OutputLine) {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
            self.evicted += 1;
        }
        self.lines.push_back(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.evicted = 0;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lines dropped since the last clear.
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn count_for(&self, stream: Stream) -> usize {
        self.lines.iter().filter(|line| line.stream == stream).count()
    }
}

/// Strips escape sequences, control characters and carriage returns.
pub fn sanitize_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.next() {
                // CSI: parameters and intermediates until a final byte in @..~
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC/DCS/SOS/PM/APC: terminated by BEL or ESC '\'
                Some(']' | 'P' | 'X' | '^' | '_') => {
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC {
                            if chars.peek() == Some(&'\\') {
                                chars.next();
                            }
                            break;
                        }
                    }
                }
                // nF sequences such as ESC ( B carry intermediates before the final byte
                Some(next) if (' '..='/').contains(&next) => {
                    while let Some(following) = chars.next() {
                        if !(' '..='/').contains(&following) {
                            break;
                        }
                    }
                }
                Some(_) | None => {}
            }
            continue;
        }

        if ch == '\t' {
            // keep column math exact
            out.push(' ');
            continue;
        }
        if ch.is_control() {
            continue;
        }
        out.push(ch);
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport<'a> {
    pub lines: Vec<&'a OutputLine>,
    pub offset: usize,
    pub total: usize,
    pub from: usize,
    pub to: usize,
}

impl Viewport<'_> {
    pub fn footer(&self) -> String {
        format!(
            "view {}-{} of {} · offset {}",
            self.from, self.to, self.total, self.offset
        )
    }
}

pub fn max_offset(total: usize, height: usize) -> usize {
    total.saturating_sub(height)
}

/// Windows the lines of `stream` matching `query`, anchored to the newest line.
pub fn visible_lines<'a>(
    buffer: &'a OutputBuffer,
    query: &str,
    stream: Stream,
    offset: usize,
    height: usize,
) -> Viewport<'a> {
    let needle = query.to_lowercase();
    let matching = buffer
        .iter()
        .filter(|line| line.stream == stream)
        .filter(|line| needle.is_empty() || line.text.to_lowercase().contains(&needle))
        .collect::<Vec<_>>();

    let total = matching.len();
    let offset = offset.min(max_offset(total, height));
    let end = total - offset;
    let start = end.saturating_sub(height);
    let lines = matching[start..end].to_vec();
    let (from, to) = if lines.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Viewport {
        lines,
        offset,
        total,
        from,
        to,
    }
}
