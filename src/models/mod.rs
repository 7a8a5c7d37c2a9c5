//! Typed request and response bodies for the endpoints whose fields the node
//! reads or writes. Everything else is passed through as raw JSON.

pub mod auth;
pub mod form_submission;
pub mod orgchart;
pub mod task;
pub mod workflow;
