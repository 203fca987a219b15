// src/dag/mod.rs

//! DAG representation and scheduling.
//!
//! - [`graph`] builds the per-run dependency graph from a flow and a
//!   registry.
//! - [`node`] holds execution nodes and their write-once result handles.
//! - [`frontier`] extracts ready nodes pass by pass.
//! - [`scheduler`] runs the dispatch loop and aggregates the outcome.
//! - [`report`] is the structured result of one run.
//! - [`plan`] replays dispatch order without executing anything.

pub mod frontier;
pub mod graph;
pub mod node;
pub mod plan;
pub mod report;
pub mod scheduler;

pub use graph::DependencyGraph;
pub use node::{ExecutionNode, NodeId, ResultHandle};
pub use plan::launch_waves;
pub use report::FlowReport;
pub use scheduler::FlowScheduler;
