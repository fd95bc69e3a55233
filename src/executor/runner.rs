use super::events::{KeywordEvent, Status};
use super::library;
use crate::debugger::Debugger;
use crate::error::{Error, Result};
use crate::parser::{expand_variables, KeywordCall, Script};
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{debug, info};

/// User keywords may nest this deep before the run fails.
pub const MAX_NESTING: usize = 100;

/// Parameters bound by one active user keyword
#[derive(Debug)]
pub struct Frame {
    pub locals: HashMap<String, String>,
}

/// Result of running a whole script
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub status: Status,
    pub keywords_run: usize,
    pub failure: Option<String>,
}

enum Stop {
    Aborted,
    Failed(Error),
}

impl From<Error> for Stop {
    fn from(e: Error) -> Self {
        Stop::Failed(e)
    }
}

/// Keyword interpreter driven by a [`Debugger`].
///
/// Every keyword, user-defined or built-in, is bracketed by the debugger's
/// entry and exit hooks, so the controller can pause it at any keyword
/// boundary.
pub struct Runner<'s> {
    script: &'s Script,
    debugger: Arc<Debugger>,
    events: Option<Sender<KeywordEvent>>,
    variables: HashMap<String, String>,
    call_stack: Vec<Frame>,
    keywords_run: usize,
}

impl<'s> Runner<'s> {
    pub fn new(script: &'s Script, debugger: Arc<Debugger>) -> Self {
        Self {
            script,
            debugger,
            events: None,
            variables: HashMap::new(),
            call_stack: Vec::new(),
            keywords_run: 0,
        }
    }

    pub fn with_events(mut self, events: Sender<KeywordEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Run the script body to completion, failure or session shutdown.
    pub fn run(&mut self) -> RunSummary {
        let script = self.script;
        let mut outcome = Ok(());
        for call in &script.body {
            outcome = self.run_call(call);
            if outcome.is_err() {
                break;
            }
        }

        let (status, failure) = match outcome {
            Ok(()) => (Status::Pass, None),
            Err(Stop::Aborted) => (Status::Aborted, None),
            Err(Stop::Failed(e)) => (Status::Fail, Some(e.to_string())),
        };

        info!(?status, keywords = self.keywords_run, "script finished");
        self.emit(KeywordEvent::Finished {
            status,
            keywords: self.keywords_run,
        });

        RunSummary {
            status,
            keywords_run: self.keywords_run,
            failure,
        }
    }

    fn emit(&self, event: KeywordEvent) {
        if let Some(tx) = &self.events {
            // Nobody listening is fine.
            let _ = tx.send(event);
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.call_stack
            .last()
            .and_then(|frame| frame.locals.get(name))
            .or_else(|| self.variables.get(name))
            .map(String::as_str)
    }

    fn run_call(&mut self, call: &KeywordCall) -> std::result::Result<(), Stop> {
        if self.debugger.is_closed() {
            return Err(Stop::Aborted);
        }
        if self.call_stack.len() >= MAX_NESTING {
            return Err(Error::RecursionLimit {
                name: call.name.clone(),
                line: call.line,
            }
            .into());
        }

        let debugger = Arc::clone(&self.debugger);
        let guard = debugger.enter();
        let depth = guard.depth();
        // Shut down while we were waiting at the boundary.
        if debugger.is_closed() {
            return Err(Stop::Aborted);
        }

        debug!(keyword = %call.name, depth, line = call.line, "running keyword");
        self.keywords_run += 1;
        self.emit(KeywordEvent::Started {
            name: call.name.clone(),
            depth,
            line: call.line,
        });

        let result = self.execute(call);
        drop(guard);

        let status = match &result {
            Ok(()) => Status::Pass,
            Err(Stop::Aborted) => Status::Aborted,
            Err(Stop::Failed(_)) => Status::Fail,
        };
        self.emit(KeywordEvent::Ended {
            name: call.name.clone(),
            depth,
            status,
        });
        result
    }

    fn execute(&mut self, call: &KeywordCall) -> std::result::Result<(), Stop> {
        let args = call
            .args
            .iter()
            .map(|arg| expand_variables(arg, call.line, |name: &str| self.lookup(name)))
            .collect::<Result<Vec<_>>>()?;

        let script = self.script;
        if let Some(def) = script.keyword(&call.name) {
            if def.params.len() != args.len() {
                return Err(Error::Arity {
                    name: def.name.clone(),
                    expected: def.params.len(),
                    got: args.len(),
                }
                .into());
            }

            self.call_stack.push(Frame {
                locals: def.params.iter().cloned().zip(args).collect(),
            });
            let mut result = Ok(());
            for inner in &def.body {
                result = self.run_call(inner);
                if result.is_err() {
                    break;
                }
            }
            self.call_stack.pop();
            return result;
        }

        if library::is_builtin(&call.name) {
            library::call(&call.name, &args, &mut self.variables)?;
            return Ok(());
        }

        Err(Error::UnknownKeyword {
            name: call.name.clone(),
            line: call.line,
        }
        .into())
    }
}
