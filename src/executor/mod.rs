mod events;
pub mod library;
mod runner;

pub use events::{KeywordEvent, Status};
pub use runner::{Frame, RunSummary, Runner, MAX_NESTING};
