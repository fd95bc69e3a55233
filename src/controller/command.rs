use crate::debugger::Debugger;
use crate::error::{Error, Result};

/// A console command typed by the person driving the debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    StepNext,
    StepOver,
    Status,
    Help,
    Quit,
}

pub const HELP: &str =
    "Commands: (p)ause, (c)ontinue, (s)tep/stepIn, (n)ext/stepOver, status, (h)elp, (q)uit";

impl Command {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim() {
            "p" | "pause" => Ok(Command::Pause),
            "c" | "continue" | "resume" => Ok(Command::Resume),
            // Pressing Enter steps.
            "" | "s" | "step" | "stepIn" | "stepInto" => Ok(Command::StepNext),
            "n" | "next" | "stepOver" => Ok(Command::StepOver),
            "status" => Ok(Command::Status),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }

    /// Apply a run-control command. Returns false for commands that do not
    /// touch the debugger.
    pub fn apply(self, debugger: &Debugger) -> bool {
        match self {
            Command::Pause => debugger.pause(),
            Command::Resume => debugger.resume(),
            Command::StepNext => debugger.step_next(),
            Command::StepOver => debugger.step_over(),
            Command::Status | Command::Help | Command::Quit => return false,
        }
        true
    }
}
