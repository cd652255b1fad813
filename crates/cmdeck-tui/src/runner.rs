// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cmdeck_app::{OutputBuffer, OutputLine, RunStatus, Stream, sanitize_line};
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(90);
const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
/// Reported when the child ended without an exit code (killed by a signal).
const SIGNAL_EXIT_CODE: i32 = -1;
const MAX_LINE_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Line(OutputLine),
    Exited(RunStatus),
    Failed(String),
}

/// Receives events from the reader and waiter threads of one run.
pub trait RunSink: Clone + Send + 'static {
    /// Returns false once nobody is listening anymore.
    fn send(&self, event: RunEvent) -> bool;
}

impl RunSink for Sender<RunEvent> {
    fn send(&self, event: RunEvent) -> bool {
        Sender::send(self, event).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub lines: Vec<OutputLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunHandle {
    pub pid: u32,
}

/// Starts `argv` and streams both output pipes into `sink` as lines arrive.
///
/// Lines from one stream keep their order; stdout and stderr interleave in
/// whatever order the reader threads observe them. `Exited` is always the
/// last event of a run because the waiter joins both readers first.
pub fn spawn<S: RunSink>(argv: &[String], sink: S) -> Result<RunHandle> {
    let Some((program, args)) = argv.split_first() else {
        bail!("empty command line");
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {program}"))?;
    let pid = child.id();

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("missing stdout pipe for {program}"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("missing stderr pipe for {program}"))?;

    let stdout_reader = {
        let sink = sink.clone();
        thread::spawn(move || pump_lines(stdout, Stream::Stdout, &sink))
    };
    let stderr_reader = {
        let sink = sink.clone();
        thread::spawn(move || pump_lines(stderr, Stream::Stderr, &sink))
    };

    tracing::info!(pid, %program, "child spawned");
    let waiter_program = program.clone();
    thread::spawn(move || {
        let _ = stdout_reader.join();
        let _ = stderr_reader.join();
        let program = waiter_program;
        let event = match child.wait() {
            Ok(status) => {
                let status = RunStatus::from_code(status.code().unwrap_or(SIGNAL_EXIT_CODE));
                tracing::info!(pid, %program, %status, "child exited");
                RunEvent::Exited(status)
            }
            Err(error) => {
                tracing::warn!(pid, %program, %error, "wait for child failed");
                RunEvent::Failed(format!("wait for {program}: {error}"))
            }
        };
        sink.send(event);
    });

    Ok(RunHandle { pid })
}

fn pump_lines<R: Read, S: RunSink>(reader: R, stream: Stream, sink: &S) {
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut listening = true;
    loop {
        raw.clear();
        // longer lines are split into MAX_LINE_BYTES chunks
        match (&mut reader).take(MAX_LINE_BYTES).read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                // keep draining after the listener is gone so the child never blocks on a full pipe
                if listening {
                    let text = sanitize_line(&String::from_utf8_lossy(&raw));
                    listening = sink.send(RunEvent::Line(OutputLine { stream, text }));
                }
            }
            Err(error) => {
                tracing::warn!(stream = stream.label(), %error, "read child output failed");
                break;
            }
        }
    }
}

/// Runs `argv` to completion, handing each line to `on_line` as it arrives.
pub fn run_streaming(argv: &[String], mut on_line: impl FnMut(OutputLine)) -> Result<RunStatus> {
    let (tx, rx) = mpsc::channel();
    spawn(argv, tx)?;

    for event in rx {
        match event {
            RunEvent::Line(line) => on_line(line),
            RunEvent::Exited(status) => return Ok(status),
            RunEvent::Failed(message) => bail!(message),
        }
    }
    bail!("output channel closed before the child exited")
}

/// Blocking form: exit status plus the most recent `capacity` lines.
pub fn run(argv: &[String], capacity: usize) -> Result<RunOutcome> {
    let mut buffer = OutputBuffer::with_capacity(capacity);
    let status = run_streaming(argv, |line| buffer.push(line))?;
    Ok(RunOutcome {
        status,
        lines: buffer.iter().cloned().collect(),
    })
}

pub fn spinner_glyph(elapsed: Duration) -> char {
    let frame = elapsed.as_millis() / SPINNER_INTERVAL.as_millis();
    SPINNER_FRAMES[(frame % SPINNER_FRAMES.len() as u128) as usize]
}

/// Sends `tick()` every [`SPINNER_INTERVAL`] until the returned flag is set.
pub fn spawn_ticker<F>(tick: F) -> Arc<AtomicBool>
where
    F: Fn() -> bool + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    thread::spawn(move || {
        while !flag.load(Ordering::SeqCst) {
            thread::sleep(SPINNER_INTERVAL);
            if flag.load(Ordering::SeqCst) || !tick() {
                break;
            }
        }
    });
    stop
}
