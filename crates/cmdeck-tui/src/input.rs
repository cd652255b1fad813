// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use cmdeck_app::{Action, PAGE_ROWS, Tab, UiCommand, UiState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, terminal};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a [`TerminalGuard`] owns the terminal.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Menu,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Tab,
    PageUp,
    PageDown,
    Confirm,
    Cancel,
    HelpToggle,
    DigitJump(u8),
    FilterRequest,
    PaletteRequest,
    StderrToggle,
    Character(char),
    Backspace,
    Interrupt,
}

pub fn decode(key: KeyEvent, mode: CaptureMode) -> Option<InputEvent> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match (mode, key.code) {
        (_, KeyCode::Char('c')) if control => Some(InputEvent::Interrupt),
        (_, KeyCode::Enter) => Some(InputEvent::Confirm),
        (_, KeyCode::Esc) => Some(InputEvent::Cancel),
        (_, KeyCode::Backspace) => Some(InputEvent::Backspace),
        (CaptureMode::Text, KeyCode::Char(ch)) if !control && !alt => {
            Some(InputEvent::Character(ch))
        }
        (CaptureMode::Text, _) => None,
        (CaptureMode::Menu, KeyCode::Char('p')) if control => Some(InputEvent::PaletteRequest),
        (CaptureMode::Menu, _) if control || alt => None,
        (CaptureMode::Menu, KeyCode::Up | KeyCode::Char('k')) => Some(InputEvent::Up),
        (CaptureMode::Menu, KeyCode::Down | KeyCode::Char('j')) => Some(InputEvent::Down),
        (CaptureMode::Menu, KeyCode::Tab) => Some(InputEvent::Tab),
        (CaptureMode::Menu, KeyCode::PageUp) => Some(InputEvent::PageUp),
        (CaptureMode::Menu, KeyCode::PageDown) => Some(InputEvent::PageDown),
        (CaptureMode::Menu, KeyCode::Char('q')) => Some(InputEvent::Cancel),
        (CaptureMode::Menu, KeyCode::Char('?')) => Some(InputEvent::HelpToggle),
        (CaptureMode::Menu, KeyCode::Char('/')) => Some(InputEvent::FilterRequest),
        (CaptureMode::Menu, KeyCode::Char(':')) => Some(InputEvent::PaletteRequest),
        (CaptureMode::Menu, KeyCode::Char('e')) => Some(InputEvent::StderrToggle),
        (CaptureMode::Menu, KeyCode::Char(ch @ '1'..='3')) => {
            Some(InputEvent::DigitJump(ch as u8 - b'0'))
        }
        (CaptureMode::Menu, KeyCode::Char(ch)) => Some(InputEvent::Character(ch)),
        (CaptureMode::Menu, _) => None,
    }
}

/// What a keystroke settled, for the dashboard loop to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Select(&'static str),
    Terminate,
    Palette,
    Filter,
    /// Inline capture ended; empty when aborted.
    Captured(String),
}

/// Routes keystrokes either to menu navigation or to one inline capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputController {
    mode: CaptureMode,
}

impl Default for InputController {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Menu,
        }
    }
}

impl InputController {
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn begin_capture(
        &mut self,
        ui: &mut UiState,
        label: impl Into<String>,
        initial: impl Into<String>,
    ) -> Result<()> {
        if self.mode == CaptureMode::Text {
            bail!("inline capture already active");
        }
        self.mode = CaptureMode::Text;
        ui.dispatch(UiCommand::OpenPrompt {
            label: label.into(),
            value: initial.into(),
        });
        Ok(())
    }

    pub fn handle_key(
        &mut self,
        ui: &mut UiState,
        catalog: &[Action],
        key: KeyEvent,
    ) -> Option<Resolution> {
        let event = decode(key, self.mode)?;
        match self.mode {
            CaptureMode::Menu => handle_menu_event(ui, catalog, event),
            CaptureMode::Text => self.handle_capture_event(ui, event),
        }
    }

    fn handle_capture_event(&mut self, ui: &mut UiState, event: InputEvent) -> Option<Resolution> {
        match event {
            InputEvent::Character(ch) => {
                ui.dispatch(UiCommand::PushPromptChar(ch));
                None
            }
            InputEvent::Backspace => {
                ui.dispatch(UiCommand::PopPromptChar);
                None
            }
            InputEvent::Confirm => {
                let value = ui
                    .inline_prompt
                    .as_ref()
                    .map(|prompt| prompt.value.clone())
                    .unwrap_or_default();
                Some(self.end_capture(ui, value))
            }
            InputEvent::Cancel | InputEvent::Interrupt => Some(self.end_capture(ui, String::new())),
            _ => None,
        }
    }

    fn end_capture(&mut self, ui: &mut UiState, value: String) -> Resolution {
        ui.dispatch(UiCommand::ClosePrompt);
        self.mode = CaptureMode::Menu;
        Resolution::Captured(value)
    }
}

fn handle_menu_event(
    ui: &mut UiState,
    catalog: &[Action],
    event: InputEvent,
) -> Option<Resolution> {
    match event {
        InputEvent::Up => {
            ui.dispatch(UiCommand::MoveSelection {
                delta: -1,
                len: catalog.len(),
            });
            None
        }
        InputEvent::Down => {
            ui.dispatch(UiCommand::MoveSelection {
                delta: 1,
                len: catalog.len(),
            });
            None
        }
        InputEvent::Tab => {
            ui.dispatch(UiCommand::NextTab);
            None
        }
        InputEvent::PageUp => {
            ui.dispatch(UiCommand::ScrollOutput(PAGE_ROWS));
            None
        }
        InputEvent::PageDown => {
            ui.dispatch(UiCommand::ScrollOutput(-PAGE_ROWS));
            None
        }
        InputEvent::Confirm => {
            let action = catalog.get(ui.active_index)?;
            ui.dispatch(UiCommand::JumpTab(Tab::Output));
            Some(Resolution::Select(action.key))
        }
        InputEvent::Cancel | InputEvent::Interrupt => Some(Resolution::Terminate),
        InputEvent::HelpToggle => {
            ui.dispatch(UiCommand::ToggleHelp);
            None
        }
        InputEvent::DigitJump(digit) => {
            if let Some(tab) = Tab::from_digit(digit) {
                ui.dispatch(UiCommand::JumpTab(tab));
            }
            None
        }
        InputEvent::FilterRequest => Some(Resolution::Filter),
        InputEvent::PaletteRequest => Some(Resolution::Palette),
        InputEvent::StderrToggle => {
            ui.dispatch(UiCommand::ToggleStderr);
            None
        }
        InputEvent::Character(_) | InputEvent::Backspace => None,
    }
}

/// Raw mode plus alternate screen for as long as the guard lives.
///
/// Dropping the guard restores the terminal, including on early `?` returns.
/// A panic hook restores it before the panic message prints.
pub struct TerminalGuard {
    hook_installed: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        if RAW_MODE_ACTIVE.swap(true, Ordering::SeqCst) {
            bail!("terminal raw mode is already active");
        }

        if let Err(error) = enable_raw_mode() {
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            return Err(error).context("enable raw mode");
        }
        if let Err(error) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            restore_terminal_best_effort();
            return Err(error).context("enter alternate screen");
        }

        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            previous(info);
        }));
        tracing::debug!("terminal raw mode entered");

        Ok(Self {
            hook_installed: true,
        })
    }

    pub fn is_active() -> bool {
        RAW_MODE_ACTIVE.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.hook_installed {
            let _ = panic::take_hook();
        }
        restore_terminal_best_effort();
        tracing::debug!("terminal restored");
    }
}

fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = disable_raw_mode();
    }
}
