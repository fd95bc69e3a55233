//! Stepping debugger for nested keyword execution.
//!
//! A worker thread runs keywords and calls the debugger's entry and exit
//! hooks around each one; a controller thread pauses, resumes and steps it.
//! See [`debugger::Debugger`].

pub mod config;
pub mod controller;
pub mod debugger;
pub mod error;
pub mod executor;
pub mod parser;

pub use error::{Error, Result};
