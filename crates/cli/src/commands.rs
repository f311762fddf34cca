use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, help = "Settings file path (default: $METEOFLUX_CONFIG or meteoflux.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Load extra environment variables from this .env file")]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep the station logger alive and ship its rows to InfluxDB
    Run {
        #[command(flatten)]
        args: ConfigArgs,
    },
    /// Validate the settings and print what would be used
    Check {
        #[command(flatten)]
        args: ConfigArgs,
    },
    /// Print the newest timestamp already stored in InfluxDB
    Watermark {
        #[command(flatten)]
        args: ConfigArgs,
    },
}
