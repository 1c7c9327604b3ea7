use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const AUDIT_TARGET: &str = "docquery::audit";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

/// Initializes the logging system from the default file `log4rs.yaml` in the working directory.
///
/// # Errors
/// Returns an error if the file cannot be read or a logger is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    init_path(Path::new("log4rs.yaml"))
}

/// Initializes the logging system from a specific config file path.
///
/// # Errors
/// Returns an error if the file cannot be read or a logger is already installed.
pub fn init_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

/// Log to stderr at `level`.
///
/// # Errors
/// Returns an error if a logger is already installed.
pub fn init_console(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Build a rolling-file configuration under `dir`: `docquery.log` for everything
/// and `audit.log` for the per-update summaries. `retention` rolled files are kept.
///
/// # Errors
/// Returns an error if the directory cannot be created or an appender fails to build.
pub fn file_config(
    dir: &Path,
    level: LevelFilter,
    retention: u32,
) -> Result<Config, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let app = rolling_appender(dir, "docquery", retention)?;
    let audit = rolling_appender(dir, "audit", retention)?;
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(app)))
        .appender(Appender::builder().build("audit", Box::new(audit)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, level))
        .build(Root::builder().appender("app").build(level))?;
    Ok(config)
}

fn rolling_appender(
    dir: &Path,
    stem: &str,
    retention: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", dir.join(format!("{stem}.{{}}.log")).display()), retention)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(dir.join(format!("{stem}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Install the rolling-file configuration of [`file_config`].
///
/// # Errors
/// Returns an error if the configuration cannot be built or a logger is already installed.
pub fn init_in(dir: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_config(file_config(dir, level, 7)?)?;
    Ok(())
}

/// Map `error|warn|info|debug|trace|off` (any case) to a level; anything else is `Info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Configure logging from environment variables if present:
/// - `DOCQUERY_LOG_DIR` (files; stderr when unset)
/// - `DOCQUERY_LOG_LEVEL`
///
/// # Errors
/// Returns an error if the logger cannot be installed.
pub fn init_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("DOCQUERY_LOG_LEVEL").map_or(LevelFilter::Info, |s| parse_level(&s));
    match std::env::var("DOCQUERY_LOG_DIR").ok().map(PathBuf::from) {
        Some(dir) => init_in(&dir, level),
        None => init_console(level),
    }
}
