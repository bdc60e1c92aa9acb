use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use linkkeeper::cli::{Cli, Commands};
use linkkeeper::config::StaticConfig;
use linkkeeper::errors::LinkerError;
use linkkeeper::runtime::modes;
use linkkeeper::system::logging::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::GenerateConfig { output_path, force } = cli.command() {
        return generate_config(output_path.as_deref(), force);
    }

    // 配置错误在任何端口绑定之前终止进程
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_logging(&config.logging);

    let result = match cli.command() {
        Commands::Sweep => modes::run_sweep(&config).await.map(|_| ()),
        _ => modes::run_server(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", format_fatal(&e));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> linkkeeper::errors::Result<StaticConfig> {
    let config = StaticConfig::load(Some(path))?;
    config.validate()?;
    Ok(config)
}

fn generate_config(output_path: Option<&str>, force: bool) -> ExitCode {
    let sample = StaticConfig::generate_sample_config();

    let Some(path) = output_path else {
        println!("{}", sample);
        return ExitCode::SUCCESS;
    };

    if Path::new(path).exists() && !force {
        let err = LinkerError::config(format!(
            "{} already exists, pass --force to overwrite",
            path
        ));
        eprintln!("{}", err.format_colored());
        return ExitCode::FAILURE;
    }

    match std::fs::write(path, sample) {
        Ok(()) => {
            println!("Sample configuration written to {}", path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let err = LinkerError::config(format!("Failed to write {}: {}", path, e));
            eprintln!("{}", err.format_colored());
            ExitCode::FAILURE
        }
    }
}

fn format_fatal(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LinkerError>() {
        Some(linker_err) => linker_err.format_colored(),
        None => format!("[ERROR] {:#}", err),
    }
}
