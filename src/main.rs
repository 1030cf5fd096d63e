// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> load_config --> Logging --> Command Dispatch
//!   Run | List | Options            (Version and Configs need no config)
//! ```

use std::process::ExitCode;

use harbor_rs::cli::{self, Command};
use harbor_rs::cmd::config::{
    build_config_loader, load_config, run_configs_command, run_options_command,
};
use harbor_rs::cmd::list::run_list_command;
use harbor_rs::cmd::run::run_deploy_command;
use harbor_rs::config::Config;
use harbor_rs::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let Some(command) = &cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        return ExitCode::FAILURE;
    };

    match command {
        Command::Version => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Command::Configs => {
            run_configs_command(&build_config_loader(&cli.global).format_loaded_files());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let extra = match command {
        Command::Run(args) => args.to_config_overrides(),
        _ => Vec::new(),
    };
    let config = match load_config(&cli.global, &extra) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(command, &config).await
}

async fn dispatch_command(command: &Command, config: &Config) -> ExitCode {
    let result = match command {
        Command::Run(args) => run_deploy_command(args, config).await,
        Command::List(args) => {
            run_list_command(args, config);
            Ok(())
        }
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::Version | Command::Configs => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
