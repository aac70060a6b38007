use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("task failed: {0}")]
    Task(#[from] super::TaskError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    // 0: success
    // 11: config error
    // 20: server / IO error
    // 30: prediction run failed
    // 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 11,
            Self::Server(_) | Self::Io(_) | Self::Command(_) => 20,
            Self::Task(_) => 30,
            Self::Anyhow(_) => 50,
        }
    }
}
