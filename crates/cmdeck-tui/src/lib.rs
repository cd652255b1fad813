// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod fallback;
pub mod input;
pub mod render;
pub mod runner;

use anyhow::{Context, Result};
use cmdeck_app::{Action, FieldSpec, SessionState, Tab, UiCommand, UiState, best_match_index};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

pub use fallback::run_line_mode;
pub use input::{CaptureMode, InputController, InputEvent, Resolution, TerminalGuard, decode};
pub use render::{ComposedFrame, Theme, compose_frame};
pub use runner::{RunEvent, RunOutcome, RunSink};

const POLL_INTERVAL: Duration = Duration::from_millis(30);
/// Readers block once this many run events are queued.
pub const RUN_CHANNEL_CAPACITY: usize = 1024;
const DRAIN_MAX_EVENTS: usize = 256;
const DRAIN_MAX_TIME: Duration = Duration::from_millis(16);
const BUSY_NOTICE: &str = "run in progress; wait for it to finish";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Shown in the status line.
    pub command_line: String,
    pub argv: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub field: FieldSpec,
    pub value: String,
}

/// Turns an action plus collected prompt values into something to spawn.
pub trait DashboardRuntime {
    fn build_plan(&mut self, action: &Action, values: &[FieldValue]) -> Result<ExecutionPlan>;
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub catalog: &'static [Action],
    pub theme: Theme,
    /// Force line mode even on a terminal.
    pub plain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    Run { run_id: u64, event: RunEvent },
    Tick { run_id: u64 },
}

#[derive(Debug, Clone)]
struct LoopSink {
    run_id: u64,
    tx: SyncSender<InternalEvent>,
}

impl RunSink for LoopSink {
    fn send(&self, event: RunEvent) -> bool {
        self.tx
            .send(InternalEvent::Run {
                run_id: self.run_id,
                event,
            })
            .is_ok()
    }
}

/// What one bounded drain of the run channel did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainPass {
    pub applied: usize,
    pub changed: bool,
    /// Stopped on the event or time budget rather than an empty channel.
    pub saturated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingCapture {
    Palette,
    Filter,
    Field {
        action_index: usize,
        field_index: usize,
        values: Vec<FieldValue>,
    },
}

#[derive(Debug)]
struct ActiveRun {
    id: u64,
    started: Instant,
    stop_ticker: Arc<AtomicBool>,
}

/// Ties keystrokes, prompts and runs together; the only writer of UI and session state.
#[derive(Debug)]
pub struct Dashboard<'a> {
    catalog: &'a [Action],
    controller: InputController,
    pending: Option<PendingCapture>,
    active_run: Option<ActiveRun>,
    last_run_id: u64,
    tx: SyncSender<InternalEvent>,
}

impl<'a> Dashboard<'a> {
    pub fn new(catalog: &'a [Action], tx: SyncSender<InternalEvent>) -> Self {
        Self {
            catalog,
            controller: InputController::default(),
            pending: None,
            active_run: None,
            last_run_id: 0,
            tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active_run.is_some()
    }

    pub fn handle_key<R: DashboardRuntime>(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        runtime: &mut R,
        key: KeyEvent,
    ) -> Flow {
        let Some(resolution) = self.controller.handle_key(ui, self.catalog, key) else {
            return Flow::Continue;
        };

        match resolution {
            Resolution::Terminate => {
                if let Some(run) = &self.active_run {
                    tracing::info!(run_id = run.id, "quit with a live run; child left running");
                }
                return Flow::Quit;
            }
            Resolution::Select(key) => self.begin_action(ui, session, runtime, key),
            Resolution::Palette => {
                self.open_capture(ui, session, PendingCapture::Palette, "palette", String::new());
            }
            Resolution::Filter => {
                let current = ui.output_search.clone();
                self.open_capture(ui, session, PendingCapture::Filter, "filter", current);
            }
            Resolution::Captured(value) => self.finish_capture(ui, session, runtime, value),
        }
        Flow::Continue
    }

    /// Applies queued run events until the channel is empty or the batch budget is spent.
    pub fn drain(&mut self, session: &mut SessionState, rx: &Receiver<InternalEvent>) -> DrainPass {
        let started = Instant::now();
        let mut pass = DrainPass::default();
        while pass.applied < DRAIN_MAX_EVENTS && started.elapsed() < DRAIN_MAX_TIME {
            let Ok(event) = rx.try_recv() else {
                return pass;
            };
            pass.applied += 1;
            pass.changed |= self.apply_internal(session, event);
        }
        pass.saturated = true;
        pass
    }

    /// Applies one event from a run; returns whether anything visible changed.
    pub fn apply_internal(&mut self, session: &mut SessionState, event: InternalEvent) -> bool {
        match event {
            InternalEvent::Run { run_id, .. } if run_id != self.last_run_id => false,
            InternalEvent::Run { event, .. } => {
                match event {
                    RunEvent::Line(line) => session.push_line(line),
                    RunEvent::Exited(status) => {
                        self.stop_run();
                        session.finish_run(status, OffsetDateTime::now_utc());
                    }
                    RunEvent::Failed(message) => {
                        self.stop_run();
                        session.fail(message);
                    }
                }
                true
            }
            InternalEvent::Tick { run_id } => match &self.active_run {
                Some(run) if run.id == run_id => {
                    session.spinner_tick(runner::spinner_glyph(run.started.elapsed()));
                    true
                }
                _ => false,
            },
        }
    }

    fn open_capture(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        pending: PendingCapture,
        label: impl Into<String>,
        initial: String,
    ) {
        match self.controller.begin_capture(ui, label, initial) {
            Ok(()) => self.pending = Some(pending),
            Err(error) => session.fail(error),
        }
    }

    fn begin_action<R: DashboardRuntime>(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        runtime: &mut R,
        key: &str,
    ) {
        if let Some(run) = &self.active_run {
            tracing::debug!(run_id = run.id, action = key, "run in progress; selection refused");
            session.notify(BUSY_NOTICE);
            return;
        }
        let Some(action_index) = self.catalog.iter().position(|action| action.key == key) else {
            return;
        };

        if self.catalog[action_index].fields.is_empty() {
            self.launch(ui, session, runtime, action_index, Vec::new());
        } else {
            self.prompt_field(ui, session, action_index, 0, Vec::new());
        }
    }

    fn prompt_field(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        action_index: usize,
        field_index: usize,
        values: Vec<FieldValue>,
    ) {
        let catalog = self.catalog;
        let action = &catalog[action_index];
        let field = &action.fields[field_index];
        let initial = session.remembered(&action.field_key(field)).to_owned();
        let label = if field.required {
            field.label.to_owned()
        } else {
            format!("{} (optional)", field.label)
        };
        self.open_capture(
            ui,
            session,
            PendingCapture::Field {
                action_index,
                field_index,
                values,
            },
            label,
            initial,
        );
    }

    fn finish_capture<R: DashboardRuntime>(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        runtime: &mut R,
        value: String,
    ) {
        match self.pending.take() {
            None => {}
            Some(PendingCapture::Palette) => {
                if value.trim().is_empty() {
                    return;
                }
                match best_match_index(self.catalog, &value) {
                    Some(index) => {
                        ui.dispatch(UiCommand::Select(index));
                        ui.dispatch(UiCommand::JumpTab(Tab::Commands));
                    }
                    None => tracing::debug!(query = %value, "palette found no action"),
                }
            }
            Some(PendingCapture::Filter) => {
                ui.dispatch(UiCommand::SetSearch(value));
                ui.dispatch(UiCommand::JumpTab(Tab::Output));
            }
            Some(PendingCapture::Field {
                action_index,
                field_index,
                mut values,
            }) => {
                let catalog = self.catalog;
                let action = &catalog[action_index];
                let field = action.fields[field_index];
                if let Err(error) = field.validate(&value) {
                    tracing::debug!(action = action.key, field = field.name, "required field left blank");
                    session.fail(error);
                    return;
                }
                session.remember(action.field_key(&field), &value);
                values.push(FieldValue { field, value });

                if field_index + 1 < action.fields.len() {
                    self.prompt_field(ui, session, action_index, field_index + 1, values);
                } else {
                    self.launch(ui, session, runtime, action_index, values);
                }
            }
        }
    }

    fn launch<R: DashboardRuntime>(
        &mut self,
        ui: &mut UiState,
        session: &mut SessionState,
        runtime: &mut R,
        action_index: usize,
        values: Vec<FieldValue>,
    ) {
        let catalog = self.catalog;
        let action = &catalog[action_index];
        let plan = match runtime.build_plan(action, &values) {
            Ok(plan) => plan,
            Err(error) => {
                tracing::warn!(action = action.key, error = %format!("{error:#}"), "plan rejected");
                session.fail(format!("{error:#}"));
                return;
            }
        };

        self.last_run_id += 1;
        let run_id = self.last_run_id;
        session.begin_run(&plan.command_line);
        ui.output_offset = 0;

        let sink = LoopSink {
            run_id,
            tx: self.tx.clone(),
        };
        let handle = match runner::spawn(&plan.argv, sink) {
            Ok(handle) => handle,
            Err(error) => {
                tracing::warn!(run_id, error = %format!("{error:#}"), "spawn failed");
                session.fail(format!("{error:#}"));
                return;
            }
        };

        let tx = self.tx.clone();
        // a full channel skips the tick
        let stop_ticker = runner::spawn_ticker(move || {
            !matches!(
                tx.try_send(InternalEvent::Tick { run_id }),
                Err(TrySendError::Disconnected(_))
            )
        });
        self.active_run = Some(ActiveRun {
            id: run_id,
            started: Instant::now(),
            stop_ticker,
        });
        tracing::info!(run_id, pid = handle.pid, command = %plan.command_line, "run started");
    }

    fn stop_run(&mut self) {
        if let Some(run) = self.active_run.take() {
            run.stop_ticker.store(true, Ordering::SeqCst);
            tracing::debug!(run_id = run.id, elapsed_ms = run.started.elapsed().as_millis() as u64, "run finished");
        }
    }
}

/// Interactive dashboard on a real terminal, line mode otherwise.
pub fn run_dashboard<R: DashboardRuntime>(
    ui: &mut UiState,
    session: &mut SessionState,
    runtime: &mut R,
    options: &DashboardOptions,
) -> Result<()> {
    if options.plain || !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        tracing::info!(plain = options.plain, "starting line mode");
        let (columns, _) = render::terminal_size();
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout().lock();
        return run_line_mode(
            session,
            runtime,
            options.catalog,
            &mut input,
            &mut output,
            usize::from(columns),
        );
    }

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (tx, rx) = mpsc::sync_channel(RUN_CHANNEL_CAPACITY);
    let mut dashboard = Dashboard::new(options.catalog, tx);

    let result = event_loop(
        &mut terminal,
        &mut dashboard,
        ui,
        session,
        runtime,
        &rx,
        &options.theme,
    );
    drop(terminal);
    drop(guard);
    result
}

fn event_loop<R: DashboardRuntime>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dashboard: &mut Dashboard<'_>,
    ui: &mut UiState,
    session: &mut SessionState,
    runtime: &mut R,
    rx: &Receiver<InternalEvent>,
    theme: &Theme,
) -> Result<()> {
    let catalog = dashboard.catalog;
    draw(terminal, ui, session, catalog, theme)?;

    loop {
        let pass = dashboard.drain(session, rx);
        if pass.changed {
            draw(terminal, ui, session, catalog, theme)?;
        }

        let wait = if pass.saturated {
            Duration::ZERO
        } else {
            POLL_INTERVAL
        };
        if !event::poll(wait).context("poll event")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if dashboard.handle_key(ui, session, runtime, key) == Flow::Quit {
                    return Ok(());
                }
                draw(terminal, ui, session, catalog, theme)?;
            }
            Event::Resize(_, _) => draw(terminal, ui, session, catalog, theme)?,
            _ => {}
        }
    }
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ui: &mut UiState,
    session: &SessionState,
    catalog: &[Action],
    theme: &Theme,
) -> Result<()> {
    terminal
        .draw(|frame| render::render(frame, ui, session, catalog, theme))
        .context("draw frame")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        BUSY_NOTICE, DRAIN_MAX_EVENTS, Dashboard, DashboardRuntime, DrainPass, ExecutionPlan,
        FieldValue, Flow, InternalEvent, RUN_CHANNEL_CAPACITY, RunEvent, TerminalGuard,
    };
    use anyhow::{Result, bail};
    use cmdeck_app::{
        Action, BUILTIN_ACTIONS, OutputLine, SessionState, Stream, Tab, UiState, visible_lines,
    };
    use cmdeck_testkit::{emit_script, shell_argv};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc::{self, Receiver};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct ScriptRuntime {
        script: String,
        reject_with: Option<String>,
        calls: Vec<(String, Vec<String>)>,
    }

    impl ScriptRuntime {
        fn new(script: impl Into<String>) -> Self {
            Self {
                script: script.into(),
                ..Self::default()
            }
        }
    }

    impl DashboardRuntime for ScriptRuntime {
        fn build_plan(&mut self, action: &Action, values: &[FieldValue]) -> Result<ExecutionPlan> {
            let values = values.iter().map(|v| v.value.clone()).collect::<Vec<_>>();
            self.calls.push((action.key.to_owned(), values.clone()));
            if let Some(message) = &self.reject_with {
                bail!("{message}");
            }
            Ok(ExecutionPlan {
                command_line: format!("target {} {}", action.key, values.join(" ")),
                argv: shell_argv(&self.script),
            })
        }
    }

    struct Harness {
        ui: UiState,
        session: SessionState,
        runtime: ScriptRuntime,
        rx: Receiver<InternalEvent>,
        dashboard: Dashboard<'static>,
    }

    impl Harness {
        fn new(runtime: ScriptRuntime) -> Self {
            let (tx, rx) = mpsc::sync_channel(RUN_CHANNEL_CAPACITY);
            Self {
                ui: UiState::default(),
                session: SessionState::default(),
                runtime,
                rx,
                dashboard: Dashboard::new(BUILTIN_ACTIONS, tx),
            }
        }

        fn press(&mut self, code: KeyCode) -> Flow {
            self.dashboard.handle_key(
                &mut self.ui,
                &mut self.session,
                &mut self.runtime,
                KeyEvent::new(code, KeyModifiers::NONE),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn drain_until_finished(&mut self) -> Result<()> {
            while self.dashboard.is_running() {
                let event = self.rx.recv_timeout(Duration::from_secs(10))?;
                self.dashboard.apply_internal(&mut self.session, event);
            }
            Ok(())
        }

        fn prompt_value(&self) -> Option<&str> {
            self.ui.inline_prompt.as_ref().map(|prompt| prompt.value.as_str())
        }
    }

    #[cfg(unix)]
    #[test]
    fn search_run_collects_both_streams_and_shows_stdout_by_default() -> Result<()> {
        let script = emit_script(&["result one", "result two"], &["warning: slow index"], 0);
        let mut harness = Harness::new(ScriptRuntime::new(script));

        harness.press(KeyCode::Enter);
        assert_eq!(harness.ui.tab, Tab::Output);
        assert_eq!(
            harness.ui.inline_prompt.as_ref().map(|p| p.label.as_str()),
            Some("search query")
        );
        harness.type_text("AI agents");
        harness.press(KeyCode::Enter);
        assert_eq!(
            harness.ui.inline_prompt.as_ref().map(|p| p.label.as_str()),
            Some("result limit (optional)")
        );
        harness.press(KeyCode::Enter);

        assert!(harness.dashboard.is_running());
        assert_eq!(
            harness.runtime.calls,
            vec![("search".to_owned(), vec!["AI agents".to_owned(), String::new()])]
        );
        harness.drain_until_finished()?;

        assert_eq!(harness.session.last_status, "success");
        assert_eq!(harness.session.last_command, "target search AI agents ");
        assert_eq!(harness.session.output.len(), 3);
        assert_eq!(harness.session.output.count_for(Stream::Stderr), 1);

        let view = visible_lines(&harness.session.output, "", Stream::Stdout, 0, 20);
        let texts = view.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["result one", "result two"]);

        harness.press(KeyCode::Char('e'));
        let view = visible_lines(
            &harness.session.output,
            "",
            harness.ui.output_stream(),
            harness.ui.output_offset,
            20,
        );
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].text, "warning: slow index");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failed_exit_is_reported_in_status() -> Result<()> {
        let mut harness = Harness::new(ScriptRuntime::new(emit_script(&["x"], &[], 4)));
        harness.press(KeyCode::Char('k'));
        harness.press(KeyCode::Enter);
        assert_eq!(harness.runtime.calls[0].0, "doctor");
        harness.drain_until_finished()?;
        assert_eq!(harness.session.last_status, "failed (exit 4)");
        assert!(harness.session.last_finished_at.is_some());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn prompts_prefill_last_value_for_the_field() -> Result<()> {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        harness.press(KeyCode::Enter);
        harness.type_text("AI agents");
        harness.press(KeyCode::Enter);
        harness.type_text("5");
        harness.press(KeyCode::Enter);
        harness.drain_until_finished()?;

        harness.press(KeyCode::Enter);
        assert_eq!(harness.prompt_value(), Some("AI agents"));
        harness.press(KeyCode::Enter);
        assert_eq!(harness.prompt_value(), Some("5"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn selection_while_running_is_refused_with_a_notice() -> Result<()> {
        let mut harness = Harness::new(ScriptRuntime::new("sleep 0.4"));
        harness.press(KeyCode::Up);
        harness.press(KeyCode::Enter);
        assert!(harness.dashboard.is_running());
        assert_eq!(harness.session.notice, None);

        harness.press(KeyCode::Enter);
        assert!(harness.ui.inline_prompt.is_none());
        assert_eq!(harness.runtime.calls.len(), 1);
        assert!(harness.session.last_status.starts_with("running"));
        assert_eq!(harness.session.notice.as_deref(), Some(BUSY_NOTICE));

        harness.drain_until_finished()?;
        assert_eq!(harness.session.last_status, "success");
        assert_eq!(harness.session.notice, None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn flooding_run_is_drained_in_bounded_batches() -> Result<()> {
        let mut harness = Harness::new(ScriptRuntime::new("yes line | head -n 200000"));
        harness.press(KeyCode::Up);
        harness.press(KeyCode::Enter);
        thread::sleep(Duration::from_millis(300));

        let pass = harness.dashboard.drain(&mut harness.session, &harness.rx);
        assert!(pass.saturated);
        assert!(pass.changed);
        assert!(pass.applied > 0 && pass.applied <= DRAIN_MAX_EVENTS);
        assert!(harness.dashboard.is_running());
        let lines = harness.session.output.len();
        assert!(lines > 0 && lines <= pass.applied);

        assert_eq!(harness.press(KeyCode::Char('q')), Flow::Quit);
        Ok(())
    }

    #[test]
    fn drain_stops_at_an_empty_channel() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        let pass = harness.dashboard.drain(&mut harness.session, &harness.rx);
        assert_eq!(pass, DrainPass::default());
    }

    #[cfg(unix)]
    #[test]
    fn spinner_ticks_update_running_status() -> Result<()> {
        let mut harness = Harness::new(ScriptRuntime::new("sleep 0.5"));
        harness.press(KeyCode::Up);
        harness.press(KeyCode::Enter);

        let mut saw_tick = false;
        while harness.dashboard.is_running() {
            let event = harness.rx.recv_timeout(Duration::from_secs(10))?;
            let is_tick = matches!(event, InternalEvent::Tick { .. });
            harness.dashboard.apply_internal(&mut harness.session, event);
            if is_tick && harness.dashboard.is_running() {
                assert!(harness.session.last_status.starts_with("running "));
                assert!(harness.session.last_status.ends_with("target doctor "));
                saw_tick = true;
            }
        }
        assert!(saw_tick);
        Ok(())
    }

    #[test]
    fn blank_required_field_sets_error_status() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        harness.press(KeyCode::Enter);
        harness.press(KeyCode::Enter);
        assert_eq!(
            harness.session.last_status,
            "error: search query is required -- enter a value and retry"
        );
        assert!(harness.runtime.calls.is_empty());
        assert!(!harness.dashboard.is_running());
    }

    #[test]
    fn escape_during_prompt_aborts_required_field() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        harness.press(KeyCode::Enter);
        harness.type_text("half");
        harness.press(KeyCode::Esc);
        assert!(harness.session.last_status.starts_with("error: search query is required"));
        assert!(harness.ui.inline_prompt.is_none());
    }

    #[test]
    fn plan_errors_surface_without_running() {
        let mut harness = Harness::new(ScriptRuntime {
            reject_with: Some("unknown target".to_owned()),
            ..ScriptRuntime::default()
        });
        harness.press(KeyCode::Up);
        harness.press(KeyCode::Enter);
        assert_eq!(harness.session.last_status, "error: unknown target");
        assert!(!harness.dashboard.is_running());
        assert_eq!(harness.press(KeyCode::Down), Flow::Continue);
    }

    #[test]
    fn spawn_failure_surfaces_as_error_status() {
        #[derive(Debug)]
        struct MissingBinary;
        impl DashboardRuntime for MissingBinary {
            fn build_plan(&mut self, _: &Action, _: &[FieldValue]) -> Result<ExecutionPlan> {
                Ok(ExecutionPlan {
                    command_line: "nope".to_owned(),
                    argv: vec!["cmdeck-definitely-missing-binary".to_owned()],
                })
            }
        }

        let (tx, _rx) = mpsc::sync_channel(RUN_CHANNEL_CAPACITY);
        let mut dashboard = Dashboard::new(BUILTIN_ACTIONS, tx);
        let mut ui = UiState::default();
        let mut session = SessionState::default();
        dashboard.handle_key(
            &mut ui,
            &mut session,
            &mut MissingBinary,
            KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
        );
        dashboard.handle_key(
            &mut ui,
            &mut session,
            &mut MissingBinary,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        assert!(session.last_status.starts_with("error: spawn cmdeck-definitely-missing-binary"));
        assert!(!dashboard.is_running());
    }

    #[test]
    fn palette_moves_selection_to_best_match() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        harness.press(KeyCode::Char(':'));
        harness.type_text("trend");
        harness.press(KeyCode::Enter);
        assert_eq!(BUILTIN_ACTIONS[harness.ui.active_index].key, "trends");
        assert_eq!(harness.ui.tab, Tab::Commands);

        harness.press(KeyCode::Char(':'));
        harness.type_text("zzzz");
        harness.press(KeyCode::Enter);
        assert_eq!(BUILTIN_ACTIONS[harness.ui.active_index].key, "trends");
    }

    #[test]
    fn filter_prompt_sets_search_and_prefills_current_query() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        harness.press(KeyCode::Char('/'));
        harness.type_text("warn");
        harness.press(KeyCode::Enter);
        assert_eq!(harness.ui.output_search, "warn");
        assert_eq!(harness.ui.tab, Tab::Output);

        harness.press(KeyCode::Char('/'));
        assert_eq!(harness.prompt_value(), Some("warn"));
        harness.press(KeyCode::Esc);
        assert_eq!(harness.ui.output_search, "");
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        assert_eq!(harness.press(KeyCode::Char('q')), Flow::Quit);
        assert_eq!(harness.press(KeyCode::Esc), Flow::Quit);
    }

    #[test]
    fn stale_run_events_are_ignored() {
        let mut harness = Harness::new(ScriptRuntime::new("true"));
        let changed = harness.dashboard.apply_internal(
            &mut harness.session,
            InternalEvent::Run {
                run_id: 42,
                event: RunEvent::Line(OutputLine::stdout("ghost")),
            },
        );
        assert!(!changed);
        assert!(harness.session.output.is_empty());
        assert!(
            !harness
                .dashboard
                .apply_internal(&mut harness.session, InternalEvent::Tick { run_id: 0 })
        );
    }

    #[test]
    fn terminal_guard_is_inactive_outside_the_dashboard() {
        assert!(!TerminalGuard::is_active());
    }
}
