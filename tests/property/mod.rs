//! Property-based tests.
//!
//! Generated inputs check the invariants the suite relies on:
//! - retry.rs: attempt counts, last-error propagation, single-attempt equivalence
//! - gate.rs: monotonicity, strict boundary, missing assets
