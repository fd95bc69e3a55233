use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    /// The debug session ended before the keyword ran.
    Aborted,
}

/// Progress reported by the worker while it runs a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum KeywordEvent {
    Started {
        name: String,
        depth: usize,
        line: usize,
    },
    Ended {
        name: String,
        depth: usize,
        status: Status,
    },
    Finished {
        status: Status,
        keywords: usize,
    },
}

impl KeywordEvent {
    pub fn to_json(&self) -> String {
        // Only plain strings and integers: cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
