// Constants for the script sandbox

/// Maximum number of body executions allowed for a single entry into a loop.
/// The pass that would exceed it raises the guard fault instead.
pub const LOOP_ITERATION_LIMIT: usize = 10_000;

/// Prefix of per-loop guard names; the translator appends a per-call counter
pub const GUARD_PREFIX: &str = "__loop_guard_";

/// Name of the capture capability as shown in the translated listing
pub const CAPTURE_NAME: &str = "__capture";

/// Deepest allowed nesting of blocks, and of groups or unary operators
/// inside one expression
pub const MAX_NESTING_DEPTH: usize = 64;

/// Tallest expression tree the parser will build. Long operator chains
/// count one level per operator.
pub const MAX_EXPRESSION_DEPTH: usize = 512;
