// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

use crate::{OutputBuffer, OutputLine, Stream};

pub const PAGE_ROWS: isize = 10;
const STATUS_READY: &str = "ready";
const STATUS_RUNNING: &str = "running";
const STATUS_SUCCESS: &str = "success";
const STATUS_FAILED: &str = "failed";
const STATUS_ERROR: &str = "error:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Commands,
    Output,
    Help,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Commands, Self::Output, Self::Help];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Commands => "Commands",
            Self::Output => "Output",
            Self::Help => "Help",
        }
    }

    /// Tab for the `1`/`2`/`3` hotkeys.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Commands),
            2 => Some(Self::Output),
            3 => Some(Self::Help),
            _ => None,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Commands => Self::Output,
            Self::Output => Self::Help,
            Self::Help => Self::Commands,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePrompt {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub active_index: usize,
    pub tab: Tab,
    /// Distance back from the newest visible output line.
    pub output_offset: usize,
    pub output_search: String,
    pub inline_prompt: Option<InlinePrompt>,
    pub show_stderr: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_index: 0,
            tab: Tab::Commands,
            output_offset: 0,
            output_search: String::new(),
            inline_prompt: None,
            show_stderr: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    MoveSelection { delta: isize, len: usize },
    Select(usize),
    NextTab,
    JumpTab(Tab),
    ToggleHelp,
    ScrollOutput(isize),
    ToggleStderr,
    SetSearch(String),
    OpenPrompt { label: String, value: String },
    PushPromptChar(char),
    PopPromptChar,
    ClosePrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SelectionChanged(usize),
    TabChanged(Tab),
    OffsetChanged(usize),
    StreamChanged(Stream),
    SearchChanged(String),
    PromptOpened,
    PromptEdited,
    PromptClosed,
}

impl UiState {
    pub fn dispatch(&mut self, command: UiCommand) -> Vec<UiEvent> {
        match command {
            UiCommand::MoveSelection { delta, len } => {
                if len == 0 {
                    return Vec::new();
                }
                let len = len as isize;
                let current = (self.active_index as isize).min(len - 1);
                self.active_index = (current + delta).rem_euclid(len) as usize;
                vec![UiEvent::SelectionChanged(self.active_index)]
            }
            UiCommand::Select(index) => {
                self.active_index = index;
                vec![UiEvent::SelectionChanged(index)]
            }
            UiCommand::NextTab => self.set_tab(self.tab.next()),
            UiCommand::JumpTab(tab) => self.set_tab(tab),
            UiCommand::ToggleHelp => {
                let tab = if self.tab == Tab::Help {
                    Tab::Commands
                } else {
                    Tab::Help
                };
                self.set_tab(tab)
            }
            UiCommand::ScrollOutput(delta) => {
                if self.tab != Tab::Output {
                    return Vec::new();
                }
                self.output_offset = self.output_offset.saturating_add_signed(delta);
                vec![UiEvent::OffsetChanged(self.output_offset)]
            }
            UiCommand::ToggleStderr => {
                self.show_stderr = !self.show_stderr;
                self.output_offset = 0;
                vec![
                    UiEvent::StreamChanged(self.output_stream()),
                    UiEvent::OffsetChanged(0),
                ]
            }
            UiCommand::SetSearch(query) => {
                self.output_search = query;
                self.output_offset = 0;
                vec![
                    UiEvent::SearchChanged(self.output_search.clone()),
                    UiEvent::OffsetChanged(0),
                ]
            }
            UiCommand::OpenPrompt { label, value } => {
                self.inline_prompt = Some(InlinePrompt { label, value });
                vec![UiEvent::PromptOpened]
            }
            UiCommand::PushPromptChar(ch) => match self.inline_prompt.as_mut() {
                Some(prompt) => {
                    prompt.value.push(ch);
                    vec![UiEvent::PromptEdited]
                }
                None => Vec::new(),
            },
            UiCommand::PopPromptChar => match self.inline_prompt.as_mut() {
                Some(prompt) => {
                    prompt.value.pop();
                    vec![UiEvent::PromptEdited]
                }
                None => Vec::new(),
            },
            UiCommand::ClosePrompt => {
                if self.inline_prompt.take().is_some() {
                    vec![UiEvent::PromptClosed]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn output_stream(&self) -> Stream {
        if self.show_stderr {
            Stream::Stderr
        } else {
            Stream::Stdout
        }
    }

    fn set_tab(&mut self, tab: Tab) -> Vec<UiEvent> {
        self.tab = tab;
        vec![UiEvent::TabChanged(tab)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failed(i32),
}

impl RunStatus {
    pub const fn from_code(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failed(code)
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str(STATUS_SUCCESS),
            Self::Failed(code) => write!(f, "{STATUS_FAILED} (exit {code})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Input,
    Running,
    Done,
    Error,
}

impl RunPhase {
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Input => "INPUT",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Last value typed per `<action>.<field>`, used to prefill prompts.
    pub last_values: BTreeMap<String, String>,
    pub last_command: String,
    pub last_status: String,
    pub output: OutputBuffer,
    pub last_finished_at: Option<OffsetDateTime>,
    /// Shown beside the status without replacing it; cleared on the next status change.
    pub notice: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_capacity(crate::DEFAULT_OUTPUT_CAPACITY)
    }
}

impl SessionState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            last_values: BTreeMap::new(),
            last_command: String::new(),
            last_status: STATUS_READY.to_owned(),
            output: OutputBuffer::with_capacity(capacity),
            last_finished_at: None,
            notice: None,
        }
    }

    pub fn begin_run(&mut self, command_line: &str) {
        self.output.clear();
        self.last_command = command_line.to_owned();
        self.last_status = STATUS_RUNNING.to_owned();
        self.notice = None;
    }

    pub fn spinner_tick(&mut self, glyph: char) {
        self.last_status = format!("{STATUS_RUNNING} {glyph} {}", self.last_command);
    }

    pub fn push_line(&mut self, line: OutputLine) {
        self.output.push(line);
    }

    pub fn finish_run(&mut self, status: RunStatus, at: OffsetDateTime) {
        self.last_status = status.to_string();
        self.last_finished_at = Some(at);
        self.notice = None;
    }

    pub fn fail(&mut self, message: impl fmt::Display) {
        self.last_status = format!("{STATUS_ERROR} {message}");
        self.notice = None;
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn is_running(&self) -> bool {
        self.last_status.starts_with(STATUS_RUNNING)
    }

    pub fn remember(&mut self, field_key: String, value: &str) {
        self.last_values.insert(field_key, value.to_owned());
    }

    pub fn remembered(&self, field_key: &str) -> &str {
        self.last_values.get(field_key).map_or("", String::as_str)
    }
}

pub fn run_phase(ui: &UiState, session: &SessionState) -> RunPhase {
    if ui.inline_prompt.is_some() {
        return RunPhase::Input;
    }
    let status = session.last_status.as_str();
    if status.starts_with(STATUS_RUNNING) {
        RunPhase::Running
    } else if status.starts_with(STATUS_SUCCESS) {
        RunPhase::Done
    } else if status.starts_with(STATUS_FAILED) || status.starts_with(STATUS_ERROR) {
        RunPhase::Error
    } else {
        RunPhase::Idle
    }
}
