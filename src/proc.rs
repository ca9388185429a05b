//! Supervised child-process execution: command descriptions, the scoped
//! runner that tracks every spawned child, and the guarantee that all of
//! them are reconciled before the scope closes.

pub mod command;
pub mod runner;
