use super::gate::Gate;
use super::guard::KeywordGuard;
use super::stepping::{Admission, RunMode};
use crate::error::{Error, Result};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

#[derive(Debug)]
struct SessionState {
    depth: usize,
    mode: RunMode,
    /// Worker is parked inside `start_keyword`.
    blocked: bool,
    closed: bool,
}

/// Stepping debugger shared between one worker and one controller thread.
///
/// The worker brackets every keyword with [`Debugger::start_keyword`] and
/// [`Debugger::end_keyword`] (or [`Debugger::enter`]); the controller drives
/// it with `pause`, `resume`, `step_next` and `step_over`. The only place the
/// worker can be suspended is `start_keyword`.
///
/// A blocked worker is released by [`Debugger::shutdown`], which
/// [`DebugSession`] calls when it is dropped.
pub struct Debugger {
    gate: Gate<SessionState>,
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Debugger {
    /// A debugger that lets the worker run freely until told otherwise.
    pub fn new() -> Self {
        Self::with_mode(RunMode::Running)
    }

    pub fn with_mode(mode: RunMode) -> Self {
        Self {
            gate: Gate::new(SessionState {
                depth: 0,
                mode,
                blocked: false,
                closed: false,
            }),
        }
    }

    fn command(&self, name: &str, f: impl FnOnce(&SessionState) -> RunMode) {
        self.gate.update(|state| {
            if state.closed {
                debug!(command = name, "ignored, debug session closed");
                return;
            }
            let mode = f(state);
            debug!(command = name, from = ?state.mode, to = ?mode, depth = state.depth, "mode change");
            state.mode = mode;
        });
    }

    /// Make the next keyword boundary block. Idempotent.
    pub fn pause(&self) {
        self.command("pause", |_| RunMode::Paused);
    }

    /// Let the worker run until paused again.
    pub fn resume(&self) {
        self.command("resume", |_| RunMode::Running);
    }

    /// Let exactly one keyword boundary pass, at any depth.
    pub fn step_next(&self) {
        self.command("step_next", |_| RunMode::StepInto);
    }

    /// Run the keyword about to start at the current depth, including all of
    /// its nested keywords, and stop at the next keyword on the same level or
    /// shallower.
    pub fn step_over(&self) {
        self.command("step_over", |state| RunMode::step_over(state.depth));
    }

    pub fn is_paused(&self) -> bool {
        self.gate.read(|state| state.mode.is_paused())
    }

    pub fn mode(&self) -> RunMode {
        self.gate.read(|state| state.mode)
    }

    /// Number of keywords currently open in the worker.
    pub fn depth(&self) -> usize {
        self.gate.read(|state| state.depth)
    }

    /// Whether the worker is currently suspended in `start_keyword`.
    pub fn is_blocked(&self) -> bool {
        self.gate.read(|state| state.blocked)
    }

    pub fn is_closed(&self) -> bool {
        self.gate.read(|state| state.closed)
    }

    /// Wait up to `timeout` for the worker to become suspended.
    pub fn wait_until_blocked(&self, timeout: Duration) -> bool {
        self.gate.wait_for(timeout, |state| state.blocked)
    }

    /// Worker hook: called before a keyword body runs. Blocks while the run
    /// mode does not admit a keyword at the current depth.
    ///
    /// Returns the depth after entering.
    pub fn start_keyword(&self) -> usize {
        self.gate.wait_until(|state| {
            if state.closed {
                state.blocked = false;
                state.depth += 1;
                return Some(state.depth);
            }
            match state.mode.admit(state.depth) {
                Admission::Proceed { next } => {
                    if next != state.mode {
                        debug!(from = ?state.mode, to = ?next, depth = state.depth, "mode change on entry");
                    }
                    state.mode = next;
                    state.blocked = false;
                    state.depth += 1;
                    trace!(depth = state.depth, "keyword started");
                    Some(state.depth)
                }
                Admission::Block => {
                    if !state.blocked {
                        debug!(depth = state.depth, mode = ?state.mode, "worker suspended");
                        state.blocked = true;
                    }
                    None
                }
            }
        })
    }

    /// Worker hook: called after a keyword body finished, on every path.
    /// Never blocks. Returns the depth after leaving.
    pub fn end_keyword(&self) -> Result<usize> {
        self.gate.update(|state| match state.depth.checked_sub(1) {
            Some(depth) => {
                state.depth = depth;
                trace!(depth, "keyword ended");
                Ok(depth)
            }
            None => {
                warn!("end_keyword called with no keyword open");
                Err(Error::ProtocolViolation)
            }
        })
    }

    /// Enter a keyword; it is left again when the returned guard drops.
    pub fn enter(&self) -> KeywordGuard<'_> {
        let depth = self.start_keyword();
        KeywordGuard::new(self, depth)
    }

    /// End the debug session: force the worker to run freely and release it
    /// if it is blocked. Later commands are ignored. Idempotent.
    pub fn shutdown(&self) {
        self.gate.update(|state| {
            if !state.closed {
                debug!(depth = state.depth, blocked = state.blocked, "debug session closed");
            }
            state.closed = true;
            state.mode = RunMode::Running;
        });
    }
}

/// Controller-side owner of a debug session.
///
/// Workers receive clones of the shared [`Debugger`] through
/// [`DebugSession::debugger`]. Dropping the session shuts the debugger down,
/// which releases a worker blocked at a keyword boundary instead of leaving
/// its thread parked forever.
pub struct DebugSession {
    debugger: Arc<Debugger>,
}

impl DebugSession {
    pub fn new(stop_on_entry: bool) -> Self {
        let mode = if stop_on_entry {
            RunMode::Paused
        } else {
            RunMode::Running
        };
        Self {
            debugger: Arc::new(Debugger::with_mode(mode)),
        }
    }

    pub fn debugger(&self) -> Arc<Debugger> {
        Arc::clone(&self.debugger)
    }
}

impl Deref for DebugSession {
    type Target = Debugger;

    fn deref(&self) -> &Debugger {
        &self.debugger
    }
}

impl Drop for DebugSession {
    fn drop(&mut self) {
        self.debugger.shutdown();
    }
}
