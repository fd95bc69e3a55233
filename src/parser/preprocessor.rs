use super::commands::is_comment;
use super::types::LogicalLine;

const CONTINUATION: &str = "...";

fn continuation_of(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(CONTINUATION)
}

/// Join `...` continuation lines onto the last line that holds a call or a
/// definition. Blank and comment lines in between are skipped over.
///
/// A continuation with nothing to continue is kept as its own line so the
/// parser can report it.
pub fn preprocess_lines(physical: &[&str]) -> Vec<LogicalLine> {
    let mut out: Vec<LogicalLine> = Vec::new();
    let mut last_code: Option<usize> = None;

    for (i, line) in physical.iter().enumerate() {
        if let (Some(rest), Some(target)) = (continuation_of(line), last_code) {
            let rest = rest.trim();
            if !rest.is_empty() {
                let prev = &mut out[target];
                prev.text.push(' ');
                prev.text.push_str(rest);
            }
            continue;
        }

        if !is_comment(line) && continuation_of(line).is_none() {
            last_code = Some(out.len());
        }
        out.push(LogicalLine {
            text: line.to_string(),
            phys_start: i,
        });
    }

    out
}
