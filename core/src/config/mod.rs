mod load;
mod types;

pub use load::{get_vintner_data_dir, load_default, load_from};
pub use types::{
    AppConfig, AppSection, HttpServerConfig, LoggingConfig, ModelConfig, StorageConfig,
    WorkerConfig,
};
