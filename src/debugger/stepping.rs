/// Run modes for the debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Running,
    Paused,
    /// One keyword boundary may pass, then the mode falls back to `Paused`.
    StepInto,
    /// Step over the keyword sitting at `target_depth`.
    ///
    /// While `armed`, the next keyword entered is the one being stepped over and
    /// always passes. Afterwards only keywords entered deeper than
    /// `target_depth` pass; anything at or above that level blocks.
    StepOver { target_depth: usize, armed: bool },
}

/// What a keyword about to be entered at some depth is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Proceed { next: RunMode },
    Block,
}

impl RunMode {
    /// Step-over mode for a keyword about to run at `depth`.
    pub fn step_over(depth: usize) -> Self {
        RunMode::StepOver {
            target_depth: depth,
            armed: true,
        }
    }

    /// True for every mode except `Running`.
    pub fn is_paused(self) -> bool {
        self != RunMode::Running
    }

    /// Decide whether a keyword entered at pre-call `depth` may run, and which
    /// mode the debugger is left in if it does.
    pub fn admit(self, depth: usize) -> Admission {
        match self {
            RunMode::Running => Admission::Proceed { next: self },
            RunMode::Paused => Admission::Block,
            RunMode::StepInto => Admission::Proceed {
                next: RunMode::Paused,
            },
            // The worker may have unwound between the command and this call.
            RunMode::StepOver {
                target_depth,
                armed: true,
            } => Admission::Proceed {
                next: RunMode::StepOver {
                    target_depth: target_depth.min(depth),
                    armed: false,
                },
            },
            RunMode::StepOver { target_depth, .. } if depth > target_depth => {
                Admission::Proceed { next: self }
            }
            RunMode::StepOver { .. } => Admission::Block,
        }
    }
}
