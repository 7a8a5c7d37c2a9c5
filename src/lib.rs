pub mod app;
pub mod constants;
pub mod errors;
pub mod managers;
pub mod models;
pub mod node;
pub mod services;
pub mod utils;
