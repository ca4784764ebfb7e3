//! Evaluation rules for type operators.
//!
//! Each rule takes already-evaluated operands. When an operand is still
//! generic the rule returns the deferred form instead of a result.

mod conditional;
mod indexed_access;
mod infer;
mod keyof;
mod mapped;
mod string_intrinsic;
