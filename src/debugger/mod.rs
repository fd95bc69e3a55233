mod gate;
mod guard;
mod session;
mod stepping;

pub use gate::Gate;
pub use guard::KeywordGuard;
pub use session::{DebugSession, Debugger};
pub use stepping::{Admission, RunMode};
