pub mod api_url;
pub mod duration;
pub mod input;
pub mod listing;
pub mod nested;
pub mod operation_errors;
pub mod query;
pub mod redact;
pub mod schedule;
pub mod suggest;
pub mod text;
