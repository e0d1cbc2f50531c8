//! Console and file logging.
//!
//! Toolbox crates log through the `log` facade; the subscriber installed here
//! picks those records up as well.

use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use colored::Colorize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::APP_NAME;

const LOG_FILE_NAME: &str = "endpoint-scout.log";
/// Rolled-over files kept next to the active log.
const LOG_BACKUPS: usize = 10;
/// Environment variable overriding the console level.
const LOG_LEVEL_ENV: &str = "LOGLEVEL";
/// Everything from our own crates, info from dependencies.
const FILE_DIRECTIVES: &str = "info,endpoint_scout=debug,endpoint_scout_toolbox=debug";

/// `time|endpoint-scout|LEVEL|message`
pub struct ScoutFormatter;

impl<S, N> FormatEvent<S, N> for ScoutFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = *event.metadata().level();
        let label = level.as_str();

        write!(
            writer,
            "{}|{APP_NAME}|",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        )?;
        if writer.has_ansi_escapes() {
            let colored = match level {
                Level::TRACE => label.dimmed(),
                Level::DEBUG => label.blue(),
                Level::INFO => label.green(),
                Level::WARN => label.yellow().bold(),
                Level::ERROR => label.red().bold(),
            };
            write!(writer, "{colored}|")?;
        } else {
            write!(writer, "{label}|")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber.
///
/// The console gets `LOGLEVEL` (default `info`, or `warn` when `quiet`); the
/// file under `log_dir` gets debug output from our crates. If the log file
/// cannot be opened, logging continues on the console only.
pub fn init(log_dir: &Path, quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let console_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .event_format(ScoutFormatter)
        .with_filter(console_filter);

    let (file, file_error) = match open_log_file(log_dir) {
        Ok(file) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .event_format(ScoutFormatter)
                .with_filter(EnvFilter::new(FILE_DIRECTIVES));
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            "File logging disabled, cannot open {}: {e}",
            log_dir.join(LOG_FILE_NAME).display()
        );
    }
}

/// Create `log_dir`, roll any existing log over, and open a fresh file.
fn open_log_file(log_dir: &Path) -> io::Result<File> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    rotate(&path, LOG_BACKUPS)?;
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

/// Shift `path.1..path.{keep-1}` up by one, drop `path.{keep}`, and move
/// `path` to `path.1`.
fn rotate(path: &Path, keep: usize) -> io::Result<()> {
    if keep == 0 || !path.exists() {
        return Ok(());
    }

    let oldest = backup_path(path, keep);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..keep).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}
