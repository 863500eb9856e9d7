// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Evaluator configuration.

/// Tracked-object count above which a collection runs between top-level
/// statements.
pub const DEFAULT_GC_THRESHOLD: usize = 10;

/// Nested user-function calls allowed before evaluation fails.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// `None` disables automatic collection.
    pub gc_threshold: Option<usize>,
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            gc_threshold: Some(DEFAULT_GC_THRESHOLD),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl EvalConfig {
    pub fn with_gc_threshold(mut self, threshold: Option<usize>) -> Self {
        self.gc_threshold = threshold;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
