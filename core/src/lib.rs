pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod schema;
pub mod task;
