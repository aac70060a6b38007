use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vintner", version, about = "Wine-quality prediction service")]
pub struct Args {
    /// TOML config file; defaults to ~/.vintner/config.toml, then ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (the default when no subcommand is given).
    Serve(ServeArgs),
    /// Validate and predict one CSV file, printing the result as JSON.
    Predict(PredictArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Serve(ServeArgs::default())
    }
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Bind 127.0.0.1:5000 regardless of config.
    #[arg(long)]
    pub local: bool,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// CLI flags win over the config file; `--local` wins over both.
    pub fn resolve_bind(&self, cfg_host: &str, cfg_port: u16) -> (String, u16) {
        if self.local {
            return ("127.0.0.1".to_string(), 5000);
        }
        (
            self.host.clone().unwrap_or_else(|| cfg_host.to_string()),
            self.port.unwrap_or(cfg_port),
        )
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PredictArgs {
    /// `;`-delimited input file with a header row.
    pub file: PathBuf,

    #[arg(long)]
    pub pretty: bool,
}
