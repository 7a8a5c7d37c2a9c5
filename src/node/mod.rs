//! Host-facing data model: execution requests, input/output items, per-item
//! parameter lookup and the closed set of supported operations.

pub mod execution;
pub mod item;
pub mod operation;
pub mod parameters;

pub use execution::ExecutionInput;
pub use item::{InputItem, NodeItem, PairedItem};
pub use operation::Operation;
pub use parameters::NodeParameters;
