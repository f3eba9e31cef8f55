//! Workspace root package.
//!
//! Carries workspace-level tooling only (pre-commit hooks via `rusty-hook`);
//! the planner lives in the crates under `crates/`.
