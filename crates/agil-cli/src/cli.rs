use std::path::PathBuf;

use agil_core::models::Platform;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "agil")]
#[command(about = "Run the Agil app shell initialization pass from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file (environment variables are used when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one initialization pass with a headless host
    Init {
        /// Latitude reported by the simulated device
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude reported by the simulated device
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Platform reported to the backend
        #[arg(long, value_enum, default_value_t = PlatformArg::Android)]
        platform: PlatformArg,
        /// Simulate the user declining notifications
        #[arg(long)]
        deny_notifications: bool,
        /// Simulate the user declining location access
        #[arg(long)]
        deny_location: bool,
        /// Push registration token handed out by the simulated messaging SDK
        #[arg(long, value_name = "TOKEN")]
        push_token: Option<String>,
        /// Platform build number reported to the backend
        #[arg(long, value_name = "NUMBER", default_value = "1")]
        build_number: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the push topic for a location
    Topic {
        /// City name
        city: String,
        /// State or region
        #[arg(long)]
        state: Option<String>,
        /// Country
        #[arg(long)]
        country: Option<String>,
    },
    /// Show whether a URL opens inside the dashboard view
    Link {
        /// URL requested by the dashboard
        url: String,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PlatformArg {
    Android,
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Android => Self::Android,
            PlatformArg::Ios => Self::Ios,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
