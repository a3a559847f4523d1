//! Agil CLI - headless host for the app shell initialization pass
//!
//! Runs the same pipeline the mobile shell runs on launch, with scripted
//! permissions, a fixed location and a recording messaging SDK.

mod cli;
mod commands;
mod error;
mod host;

use std::path::Path;

use agil_core::config::{AppConfig, ResolvedConfig};
use agil_core::models::LocationFix;
use clap::Parser;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::init::{run_init, InitOptions};
use crate::error::CliError;
use crate::host::ScriptedPermissions;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agil=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            lat,
            lon,
            platform,
            deny_notifications,
            deny_location,
            push_token,
            build_number,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let options = InitOptions {
                fix: LocationFix::new(lat, lon),
                platform: platform.into(),
                permissions: ScriptedPermissions {
                    deny_notifications,
                    deny_location,
                },
                push_token,
                build_number,
                json,
            };
            run_init(&config, options).await
        }
        Commands::Topic {
            city,
            state,
            country,
        } => commands::topic::run_topic(&city, state.as_deref(), country.as_deref()),
        Commands::Link { url } => {
            let config = load_config(cli.config.as_deref())?;
            commands::link::run_link(&config, &url);
            Ok(())
        }
        Commands::Config {
            command: ConfigCommands::Show { json },
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::config::run_config_show(&config, json)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ResolvedConfig, CliError> {
    let config = match path {
        Some(path) => AppConfig::from_json_path(path)?,
        None => AppConfig::from_env()?,
    };
    Ok(config.resolve()?)
}
