use super::commands::split_words;
use crate::error::{Error, Result};

/// Parse a `:name param...` definition header. Returns `None` for lines that
/// are not definitions.
pub fn parse_definition(text: &str, line: usize) -> Result<Option<(String, Vec<String>)>> {
    let Some(rest) = text.trim().strip_prefix(':') else {
        return Ok(None);
    };

    let mut words = split_words(rest, line)?.into_iter();
    let name = words.next().ok_or_else(|| Error::Parse {
        line,
        message: "keyword definition without a name".to_string(),
    })?;

    Ok(Some((name, words.collect())))
}
