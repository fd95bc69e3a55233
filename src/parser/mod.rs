mod commands;
mod labels;
mod preprocessor;
mod types;

pub use commands::{expand_variables, is_comment, parse_call, split_words};
pub use labels::parse_definition;
pub use preprocessor::preprocess_lines;
pub use types::{KeywordCall, KeywordDef, LogicalLine, Script};

use crate::error::{Error, Result};
use std::collections::hash_map::Entry;
use std::path::Path;

/// Parse a keyword script.
///
/// Calls before the first `:name` definition form the script body; every
/// definition owns the calls up to the next one.
pub fn parse_script(source: &str) -> Result<Script> {
    let physical: Vec<&str> = source.lines().collect();
    let logical = preprocess_lines(&physical);

    let mut script = Script::default();
    let mut current: Option<KeywordDef> = None;

    for ll in &logical {
        let line = ll.phys_start + 1;
        if is_comment(&ll.text) {
            continue;
        }
        if ll.text.trim_start().starts_with("...") {
            return Err(Error::Parse {
                line,
                message: "continuation without a line to continue".to_string(),
            });
        }

        if let Some((name, params)) = parse_definition(&ll.text, line)? {
            if let Some(def) = current.take() {
                insert_definition(&mut script, def)?;
            }
            current = Some(KeywordDef {
                name,
                params,
                body: Vec::new(),
                line,
            });
            continue;
        }

        if let Some(call) = parse_call(&ll.text, line)? {
            match current.as_mut() {
                Some(def) => def.body.push(call),
                None => script.body.push(call),
            }
        }
    }

    if let Some(def) = current.take() {
        insert_definition(&mut script, def)?;
    }

    tracing::debug!(
        calls = script.body.len(),
        keywords = script.keywords.len(),
        "parsed keyword script"
    );
    Ok(script)
}

fn insert_definition(script: &mut Script, def: KeywordDef) -> Result<()> {
    match script.keywords.entry(def.name.to_lowercase()) {
        Entry::Occupied(existing) => Err(Error::DuplicateKeyword {
            name: def.name,
            first: existing.get().line,
            second: def.line,
        }),
        Entry::Vacant(slot) => {
            slot.insert(def);
            Ok(())
        }
    }
}

/// Read and parse a keyword script from disk.
pub fn load_script(path: impl AsRef<Path>) -> Result<Script> {
    let contents = std::fs::read_to_string(path)?;
    parse_script(&contents)
}
