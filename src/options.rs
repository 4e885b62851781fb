use serde::Serialize;

/// Default limit on function-literal nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What to do with an opcode or literal tag that is not in the tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Emit an `(unknown)` line, consume only the opcode/tag byte and keep going.
    ///
    /// Any operand bytes the value really carries are then read as the next
    /// opcode, so everything after it may be misaligned.
    #[default]
    Annotate,
    /// Stop decoding with an error.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeOptions {
    pub unknown: UnknownPolicy,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            unknown: UnknownPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_unknown(mut self, policy: UnknownPolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
