use crate::{
    commands::{Commands, ConfigArgs},
    env::EnvManager,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use engine_config::settings::{
    self, DEFAULT_CONFIG_PATH,
    env::{CONFIG_PATH_VAR, INFLUX_BUCKET_VAR, INFLUX_ORG_VAR, INFLUX_TOKEN_VAR, INFLUX_URL_VAR},
    validated::ValidatedSettings,
};
use engine_runtime::execution::executor;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "meteoflux",
    version,
    about = "Ships WinMeteo station data to InfluxDB and keeps the logger running"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match execute(cli.command).await {
        Ok(code) => code.into(),
        Err(e) => {
            error!("{e}");
            ExitCode::GeneralError.into()
        }
    }
}

async fn execute(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Run { args } => {
            let (settings, _) = load_settings(&args)?;

            let shutdown = ShutdownCoordinator::new(CancellationToken::new());
            shutdown.register_handlers();

            executor::run(settings, shutdown.cancel_token()).await?;

            if shutdown.is_shutdown_requested() {
                return Ok(ExitCode::ShutdownRequested);
            }
        }
        Commands::Check { args } => {
            let (settings, env) = load_settings(&args)?;
            print_settings(&settings, &env);
        }
        Commands::Watermark { args } => {
            let (settings, _) = load_settings(&args)?;
            match executor::current_watermark(&settings).await? {
                Some(ts) => println!("{}", ts.format("%Y-%m-%d %H:%M:%S %Z")),
                None => println!("no data for measurement '{}'", settings.measurement()),
            }
        }
    }

    Ok(ExitCode::Success)
}

/// Resolves the settings file (`--config`, then `$METEOFLUX_CONFIG`, then
/// the default), overlays the environment and validates.
fn load_settings(args: &ConfigArgs) -> Result<(ValidatedSettings, EnvManager), CliError> {
    let mut env = EnvManager::new();
    if let Some(env_file) = &args.env_file {
        env.load_from_file(env_file)?;
    }

    let path = args
        .config
        .clone()
        .or_else(|| env.get(CONFIG_PATH_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    info!("Loading settings from {}", path.display());
    let settings = settings::load(&path, env.all())?;
    Ok((settings, env))
}

fn print_settings(settings: &ValidatedSettings, env: &EnvManager) {
    let token = if settings.influx.token.is_empty() {
        "not set"
    } else {
        "set"
    };

    println!("Resolved settings:");
    println!("-----------------------------");
    println!("{:<18} {}", "Source", settings.dbf_path.display());
    println!("{:<18} {}", "Timezone", settings.timezone);
    println!("{:<18} {}", "InfluxDB URL", settings.influx.url);
    println!("{:<18} {}", "Organization", settings.influx.org);
    println!("{:<18} {}", "Bucket", settings.influx.bucket);
    println!("{:<18} {}", "Measurement", settings.influx.measurement);
    println!("{:<18} {}", "Token", token);
    println!("{:<18} -{}", "Lookback", settings.influx.lookback);
    println!("{:<18} {}s", "Poll interval", settings.timers.poll_interval);
    println!("{:<18} {}s", "Error backoff", settings.timers.error_backoff);
    println!("{:<18} {}s", "Stall timeout", settings.timers.stall_timeout);
    println!("{:<18} {} polls", "Stall threshold", settings.stall_threshold);
    println!("{:<18} {}s", "Kill wait", settings.timers.kill_wait);
    println!("{:<18} {}", "Process", settings.process.name);
    println!("{:<18} {}", "Working dir", settings.process.working_dir.display());

    let overrides = [INFLUX_URL_VAR, INFLUX_TOKEN_VAR, INFLUX_ORG_VAR, INFLUX_BUCKET_VAR]
        .into_iter()
        .filter_map(|var| env.display_value(var).map(|value| (var, value)))
        .collect::<Vec<_>>();

    if !overrides.is_empty() {
        println!();
        println!("Environment overrides:");
        for (var, value) in overrides {
            println!("  {var}={value}");
        }
    }
}
