#[allow(clippy::module_inception)]
pub mod error;
pub mod dataset;
pub mod model;
pub mod task;

pub use dataset::DatasetError;
pub use error::CliError;
pub use model::ModelError;
pub use task::TaskError;
