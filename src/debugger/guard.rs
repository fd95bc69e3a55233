use super::Debugger;

/// An open keyword. Dropping it runs the leave-hook, so the depth stays
/// consistent when the keyword body returns early, fails, or panics.
pub struct KeywordGuard<'a> {
    debugger: &'a Debugger,
    depth: usize,
}

impl<'a> KeywordGuard<'a> {
    pub(super) fn new(debugger: &'a Debugger, depth: usize) -> Self {
        Self { debugger, depth }
    }

    /// Depth of the debugger once this keyword was entered.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for KeywordGuard<'_> {
    fn drop(&mut self) {
        // Only fails if end_keyword was also called by hand.
        if let Err(e) = self.debugger.end_keyword() {
            tracing::error!(depth = self.depth, "failed to leave keyword: {}", e);
        }
    }
}
