use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use kick_core::MatchConfig;
use kick_executor::{ControlMsg, Executor, MatchSummary};
use kick_simulator::{LogObserver, MatchBuilder, SimpleAi};

mod logging;

#[derive(Debug, Parser)]
#[command(name = "kick-cli", about = "Run a simulated two-robot soccer match")]
struct Args {
    /// JSON match configuration. Missing fields take their defaults.
    #[clap(long, short)]
    config: Option<PathBuf>,

    #[clap(long, default_value = "info")]
    log_level: String,

    /// Path of the JSON log file, `auto` or `none`
    #[clap(long, default_value = "auto")]
    log_file: String,

    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    yellow_ai: bool,

    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    blue_ai: bool,

    /// Seconds between landmark fixes of the AI robots
    #[clap(long, default_value_t = 0.5)]
    fix_interval: f64,

    /// Overrides the ball placement seed of the config
    #[clap(long)]
    seed: Option<u64>,

    /// Give up after this many seconds of wall time
    #[clap(long)]
    max_duration: Option<f64>,

    /// Print the default configuration and exit
    #[clap(long)]
    dump_config: bool,
}

impl Args {
    fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.game.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&MatchConfig::default())?);
        return Ok(());
    }

    let _guard = logging::setup(&args.log_level, logging::log_file_path(&args.log_file)?)?;

    let config = args.match_config()?;
    let mut builder = MatchBuilder::new(config).with_observer(LogObserver::new());
    if args.yellow_ai {
        builder = builder.with_controller(SimpleAi::with_fix_interval("yellow", args.fix_interval));
    }
    if args.blue_ai {
        builder = builder.with_controller(SimpleAi::with_fix_interval("blue", args.fix_interval));
    }
    let game = builder.build().context("Failed to set up the match")?;

    let executor = Executor::new(game);
    let handle = executor.handle();
    let mut main_task = tokio::spawn(executor.run_until_game_over());

    let timeout = async {
        match args.max_duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs_f64(secs.max(0.0))).await,
            None => std::future::pending().await,
        }
    };

    let summary: MatchSummary = tokio::select! {
        result = &mut main_task => result.context("Executor task failed")??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            handle.send(ControlMsg::Shutdown);
            main_task.await.context("Executor task failed")??
        }
        _ = timeout => {
            tracing::warn!("Match not decided after {:?}s, giving up", args.max_duration);
            handle.send(ControlMsg::Shutdown);
            main_task.await.context("Executor task failed")??
        }
    };

    println!(
        "{}: yellow {} - {} blue after {:.1}s",
        if summary.finished { "Game over" } else { "Stopped" },
        summary.yellow,
        summary.blue,
        summary.duration
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["kick-cli"]).unwrap();
        assert!(args.yellow_ai && args.blue_ai);
        assert_eq!(args.log_file, "auto");
        assert_eq!(args.match_config().unwrap(), MatchConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "game": {{ "balls": 5 }} }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let args = Args::try_parse_from([
            "kick-cli",
            "--config",
            &path,
            "--seed",
            "9",
            "--blue-ai",
            "false",
        ])
        .unwrap();
        assert!(args.yellow_ai);
        assert!(!args.blue_ai);

        let config = args.match_config().unwrap();
        assert_eq!(config.game.balls, 5);
        assert_eq!(config.game.seed, Some(9));
    }
}
