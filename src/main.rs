use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

use volume_bridge::logging::{LoggingConfig, initialize_logging};
use volume_bridge::{
    Config, MethodHandler, SoundOutputInterface, StdioService, VirtualSoundOutput,
};

#[derive(Parser)]
#[command(name = "volume-bridge")]
#[command(about = "Bridge for system volume, mute and default output device control")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve method calls and device/volume events as JSON lines on stdin/stdout
    Serve,
    /// Invoke a single method and print its result
    Call {
        /// Method name, e.g. getVolume or setDefaultOutputDevice
        method: String,
        /// Arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },
    /// List output devices known to the sound output
    ListDevices,
    /// Validate configuration file
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let (_guard, log_dir) = initialize_logging(LoggingConfig::from_config(&config, cli.verbose)?)?;
    if let Some(dir) = log_dir {
        info!("Writing logs to {}", dir.display());
    }

    let sound_output = Arc::new(VirtualSoundOutput::from_config(&config));

    match cli.command {
        Some(Commands::Serve) | None => serve(sound_output, config).await?,
        Some(Commands::Call { method, args }) => {
            call(sound_output, config, &method, args.as_deref())?
        }
        Some(Commands::ListDevices) => list_devices(sound_output.as_ref())?,
        Some(Commands::CheckConfig) => check_config(&config)?,
    }

    Ok(())
}

async fn serve(sound_output: Arc<VirtualSoundOutput>, config: Config) -> Result<()> {
    let mut service = StdioService::new(sound_output, config.volume);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = service.run(stdin, stdout) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }
    Ok(())
}

fn call(
    sound_output: Arc<VirtualSoundOutput>,
    config: Config,
    method: &str,
    args: Option<&str>,
) -> Result<()> {
    let args: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("--args must be valid JSON")?,
        None => Value::Null,
    };

    let handler = MethodHandler::new(sound_output, config.volume);
    match handler.handle(method, &args) {
        Ok(result) => {
            println!("{}", result);
            Ok(())
        }
        Err(error) => anyhow::bail!("{}", error),
    }
}

fn list_devices(sound_output: &impl SoundOutputInterface) -> Result<()> {
    let devices = sound_output.retrieve_output_devices()?;
    let default = sound_output.retrieve_default_output_device().ok();

    println!("Output devices:");
    if devices.is_empty() {
        println!("  No output devices configured!");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        let marker = if default.as_ref().map(|d| &d.id) == Some(&device.id) {
            " (default)"
        } else {
            ""
        };
        println!("  {}. {}{}", i + 1, device, marker);
    }
    Ok(())
}

fn check_config(config: &Config) -> Result<()> {
    config.validate()?;

    println!("Configuration validation:");
    println!("  ✓ Configuration file parsed successfully");
    println!("  ✓ Log level: {}", config.general.log_level);
    println!("  ✓ Default volume step: {}", config.volume.default_step);
    println!("  ✓ Unmute on setVolume: {}", config.volume.unmute_on_set);
    println!("  ✓ Output devices: {}", config.devices.len());
    Ok(())
}
