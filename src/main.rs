mod commands;
mod config;
mod context;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::context::AppContext;

#[derive(Parser)]
#[command(author, version, about = "Record and play back user activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding recordings
    #[arg(long, value_name = "DIR", global = true)]
    recordings_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record user activity until interrupted
    Record {
        /// File name for the recording (defaults to recording_<timestamp>.json)
        #[arg(short, long)]
        name: Option<String>,

        /// Stop automatically after this many seconds
        #[arg(short, long, value_name = "SECONDS", value_parser = parse_seconds)]
        duration: Option<Duration>,
    },

    /// Play back a recording
    Play {
        /// Recording file to play
        file: PathBuf,

        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
        speed: f64,

        /// Log the events instead of injecting them
        #[arg(long)]
        dry_run: bool,
    },

    /// List available recordings
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env().with_recordings_dir(cli.recordings_dir);
    let ctx = AppContext::new(config);

    match cli.command {
        Some(Commands::Record { name, duration }) => commands::record(&ctx, name, duration).await?,
        Some(Commands::Play {
            file,
            speed,
            dry_run,
        }) => commands::play(&ctx, &file, speed, dry_run).await?,
        Some(Commands::List) => commands::list(&ctx)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

fn parse_speed(raw: &str) -> Result<f64, String> {
    let speed: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(format!("speed must be greater than zero, got {}", raw))
    }
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", raw))?;
    if seconds <= 0.0 {
        return Err(format!("duration must be positive, got {}", raw));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_play_defaults_to_normal_speed() {
        let cli = Cli::try_parse_from(["interactflow", "play", "demo.json"]).unwrap();
        match cli.command {
            Some(Commands::Play {
                file,
                speed,
                dry_run,
            }) => {
                assert_eq!(file, PathBuf::from("demo.json"));
                assert_eq!(speed, 1.0);
                assert!(!dry_run);
            }
            _ => panic!("expected play command"),
        }
    }

    #[test]
    fn test_speed_must_be_positive() {
        assert_eq!(parse_speed("2.5"), Ok(2.5));
        assert!(parse_speed("0").is_err());
        assert!(parse_speed("-1").is_err());
        assert!(parse_speed("fast").is_err());
        assert!(Cli::try_parse_from(["interactflow", "play", "x.json", "--speed", "0"]).is_err());
    }

    #[test]
    fn test_record_duration() {
        assert_eq!(parse_seconds("1.5"), Ok(Duration::from_millis(1500)));
        assert!(parse_seconds("0").is_err());

        let cli = Cli::try_parse_from(["interactflow", "record", "--name", "demo", "-d", "30"]).unwrap();
        match cli.command {
            Some(Commands::Record { name, duration }) => {
                assert_eq!(name.as_deref(), Some("demo"));
                assert_eq!(duration, Some(Duration::from_secs(30)));
            }
            _ => panic!("expected record command"),
        }
    }

    #[test]
    fn test_global_recordings_dir_flag() {
        let cli = Cli::try_parse_from(["interactflow", "list", "--recordings-dir", "/tmp/recs"]).unwrap();
        assert_eq!(cli.recordings_dir, Some(PathBuf::from("/tmp/recs")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }
}
