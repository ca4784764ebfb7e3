//! Centralized limits and defaults.
//!
//! Recursion limits keep pathological types (self-referential generics,
//! exploding unions) from blocking the single event loop. When a limit is hit
//! the checker degrades its output instead of failing.

/// Maximum nesting of alias/interface expansions on one evaluation path.
///
/// Past this depth a reference is printed by name rather than expanded.
///
/// ```typescript
/// type Grow<T> = { next: Grow<[T]> };
/// type Boom = Grow<string>;
/// ```
pub const MAX_EXPANSION_DEPTH: u32 = 50;

/// Maximum depth for evaluating a single type node.
pub const MAX_TYPE_NODE_DEPTH: u32 = 100;

/// Deepest type nesting `type_to_string` writes. Deeper positions print as
/// `any`, which keeps the output below [`MAX_TYPE_NODE_DEPTH`] when it is
/// parsed again.
pub const MAX_PRINT_DEPTH: u32 = 64;

/// Maximum number of members produced by distributing an intersection or
/// conditional type over unions.
pub const MAX_DISTRIBUTION_MEMBERS: usize = 10_000;

/// Maximum depth of structural assignability checks.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 100;

/// Length at which `type_to_string` truncates without `NO_TRUNCATION`.
pub const DEFAULT_TRUNCATION_LENGTH: usize = 160;

/// Quiet period before an edit triggers re-resolution.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Line width used by the renderer.
pub const DEFAULT_PRINT_WIDTH: usize = 80;

/// Indentation width used by the renderer.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Shortest quiet period the debouncer accepts.
pub const MIN_DEBOUNCE_MS: u64 = 1000;
