use super::command::{Command, HELP};
use crate::config::{DebuggerConfig, EventFormat};
use crate::debugger::{DebugSession, Debugger};
use crate::error::Result;
use crate::executor::{KeywordEvent, RunSummary, Runner, Status};
use crate::parser::Script;
use std::io::{BufRead, Write};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Render one worker event for the console.
pub fn format_event(event: &KeywordEvent, format: EventFormat) -> String {
    if format == EventFormat::Json {
        return event.to_json();
    }

    match event {
        KeywordEvent::Started { name, depth, line } => {
            format!("{}▶️  {} (line {})", indent(*depth), name, line)
        }
        KeywordEvent::Ended {
            name,
            depth,
            status,
        } => {
            let mark = match status {
                Status::Pass => "✓",
                Status::Fail => "✗",
                Status::Aborted => "⏹",
            };
            format!("{}{} {}", indent(*depth), mark, name)
        }
        KeywordEvent::Finished { status, keywords } => {
            format!("✅ Script finished: {:?} ({} keywords)", status, keywords)
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth.saturating_sub(1))
}

fn describe(debugger: &Debugger) -> String {
    format!(
        "mode={:?} depth={} {}",
        debugger.mode(),
        debugger.depth(),
        if debugger.is_blocked() {
            "⏸  waiting at keyword boundary"
        } else {
            "running"
        }
    )
}

fn print_events(events: Receiver<KeywordEvent>, format: EventFormat) {
    for event in events {
        eprintln!("{}", format_event(&event, format));
    }
}

/// What the console loop reacts to.
enum ConsoleInput {
    Line(std::io::Result<String>),
    InputClosed,
    ScriptFinished,
}

/// Debug `script` interactively.
///
/// The script runs on a worker thread and commands are read line by line
/// from `input` on a reader thread. `quit`, end of input or the script
/// finishing ends the session, which releases the worker if it is paused
/// and stops it at its next keyword.
pub fn debug_script(
    script: Script,
    config: &DebuggerConfig,
    input: impl BufRead + Send + 'static,
    mut output: impl Write,
) -> Result<RunSummary> {
    let session = DebugSession::new(config.stop_on_entry);
    let (tx, rx) = channel();
    let (console_tx, console_rx) = channel();

    let worker_debugger = session.debugger();
    let finished_tx = console_tx.clone();
    let worker = thread::spawn(move || {
        debug!("worker thread started");
        let summary = Runner::new(&script, worker_debugger)
            .with_events(tx)
            .run();
        debug!("worker thread exiting");
        let _ = finished_tx.send(ConsoleInput::ScriptFinished);
        summary
    });

    let format = config.event_format;
    let printer = thread::spawn(move || print_events(rx, format));

    // Not joined: it may sit in a blocking read after the session ends.
    thread::spawn(move || read_lines(input, console_tx));

    writeln!(output, "{}", HELP)?;
    output.flush()?;
    for message in console_rx {
        let line = match message {
            ConsoleInput::Line(line) => line?,
            ConsoleInput::InputClosed => {
                debug!("console input closed");
                break;
            }
            ConsoleInput::ScriptFinished => break,
        };
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(output, "{}", HELP)?,
            Ok(Command::Status) => writeln!(output, "{}", describe(&session))?,
            Ok(cmd) => {
                cmd.apply(&session);
            }
            Err(e) => writeln!(output, "❓ {}", e)?,
        }
        output.flush()?;
    }

    drop(session);
    let summary = match worker.join() {
        Ok(summary) => summary,
        Err(_) => {
            warn!("worker thread panicked");
            RunSummary {
                status: Status::Fail,
                keywords_run: 0,
                failure: Some("worker thread panicked".to_string()),
            }
        }
    };
    if printer.join().is_err() {
        warn!("event printer thread panicked");
    }

    if let Some(failure) = &summary.failure {
        writeln!(output, "❌ {}", failure)?;
    }
    Ok(summary)
}

fn read_lines(input: impl BufRead, console: Sender<ConsoleInput>) {
    for line in input.lines() {
        let failed = line.is_err();
        if console.send(ConsoleInput::Line(line)).is_err() || failed {
            return;
        }
    }
    let _ = console.send(ConsoleInput::InputClosed);
}

/// Run `script` without a controller.
pub fn run_script(script: &Script, format: EventFormat) -> RunSummary {
    let session = DebugSession::new(false);
    let (tx, rx) = channel();
    let printer = thread::spawn(move || print_events(rx, format));

    let summary = Runner::new(script, session.debugger())
        .with_events(tx)
        .run();

    if printer.join().is_err() {
        warn!("event printer thread panicked");
    }
    summary
}
