//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Linkkeeper - URL shortener with collision-safe aliases
#[derive(Parser, Debug)]
#[command(name = "linkkeeper")]
#[command(version)]
#[command(about = "A small URL shortener service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one retention pass and exit
    Sweep,

    /// Print a sample configuration file
    GenerateConfig {
        /// Write to this path instead of stdout
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// 未指定子命令时默认启动服务
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
