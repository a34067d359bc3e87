use std::{path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where the JSON log file goes, from the `--log-file` argument.
///
/// `auto` picks a timestamped file in the local data directory, `none` disables
/// the file, anything else is used as a path that must not exist yet.
pub fn log_file_path(arg: &str) -> Result<Option<PathBuf>> {
    match arg {
        "none" => Ok(None),
        "auto" => {
            let time = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
            let filename = format!("kick-{time}.log");
            let path = dirs::data_local_dir()
                .map(|p| p.join("kick").join(&filename))
                .unwrap_or_else(|| PathBuf::from(&filename));
            Ok(Some(path))
        }
        path => {
            let path = PathBuf::from(path);
            if path.exists() {
                bail!("Log file already exists: {}", path.display());
            }
            Ok(Some(path))
        }
    }
}

/// Install the stdout subscriber and, if requested, the JSON file layer. Records
/// from the `log` facade are forwarded.
///
/// The returned guard flushes the file writer when dropped.
pub fn setup(log_level: &str, log_file: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let log_level = tracing::Level::from_str(log_level)
        .map_err(|_| anyhow!("Invalid log level: {}", log_level))?;
    let stdout_layer = fmt::Subscriber::builder()
        .with_max_level(log_level)
        .without_time()
        .finish();

    let Some(path) = log_file else {
        stdout_layer
            .try_init()
            .context("Unable to set global tracing subscriber")?;
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
    let logfile_layer = fmt::Layer::default()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking_appender);
    stdout_layer
        .with(logfile_layer)
        .try_init()
        .context("Unable to set global tracing subscriber")?;

    tracing::info!("Saving logs to {}", path.display());
    Ok(Some(guard))
}
