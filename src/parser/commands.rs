use super::types::KeywordCall;
use crate::error::{Error, Result};

/// Check if line is a comment
pub fn is_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Split a logical line into words, honoring shell-style quotes.
pub fn split_words(text: &str, line: usize) -> Result<Vec<String>> {
    shlex::split(text).ok_or_else(|| Error::Parse {
        line,
        message: format!("unbalanced quotes in '{}'", text.trim()),
    })
}

/// Parse a keyword call line: first word is the keyword, the rest its args.
pub fn parse_call(text: &str, line: usize) -> Result<Option<KeywordCall>> {
    let mut words = split_words(text, line)?.into_iter();
    Ok(words.next().map(|name| KeywordCall {
        name,
        args: words.collect(),
        line,
    }))
}

/// Expand `${name}` references using `lookup`.
pub fn expand_variables<'a>(
    text: &str,
    line: usize,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| Error::Parse {
            line,
            message: format!("unterminated variable in '{}'", text),
        })?;
        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| Error::UnknownVariable {
            name: name.to_string(),
            line,
        })?;
        out.push_str(value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
