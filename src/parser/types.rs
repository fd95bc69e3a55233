use std::collections::HashMap;

/// One logical line: a physical line plus its `...` continuations.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub text: String,
    /// 0-based index of the physical line it starts on.
    pub phys_start: usize,
}

/// A single keyword invocation, e.g. `log "hello world"`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCall {
    pub name: String,
    pub args: Vec<String>,
    /// 1-based physical line the call starts on.
    pub line: usize,
}

/// A user keyword introduced by `:name param...`.
#[derive(Debug, Clone)]
pub struct KeywordDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<KeywordCall>,
    pub line: usize,
}

/// A parsed keyword script.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Calls before the first definition.
    pub body: Vec<KeywordCall>,
    /// User keywords, keyed by lowercase name.
    pub keywords: HashMap<String, KeywordDef>,
}

impl Script {
    pub fn keyword(&self, name: &str) -> Option<&KeywordDef> {
        self.keywords.get(&name.to_lowercase())
    }
}
