//! The run-lifecycle harness: invocation options, help rendering, the
//! idempotent cleanup registry, invocation metrics, and the runner that
//! wires them together around the user callback.

pub mod cleanup;
pub mod help;
pub mod metrics;
pub mod options;
pub mod runner;
