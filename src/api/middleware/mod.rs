//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Auth validator: bearer token → `Identity`
//! 2. Audit logger: logs after auth, has the caller's uid and role

pub mod audit;
pub mod auth;
