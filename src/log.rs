//! Log-level selection and one-shot tracing subscriber installation.

use crate::flags::bag::Flags;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Minimum severity threshold for an invocation's logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Verbose,
}

impl LogLevel {
    /// Name shown in help text.
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
        }
    }

    /// Equivalent `tracing` filter directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "trace",
        }
    }
}

/// Chooses the invocation's log level.
///
/// Precedence: an explicit verbosity flag beats the configured default beats
/// `info`. Among explicit flags, `--verbose` wins over `--debug` over
/// `--quiet` over `--silent`.
pub fn pick_level_from_flags(flags: &Flags) -> LogLevel {
    if flags.bool_flag("verbose") {
        LogLevel::Verbose
    } else if flags.bool_flag("debug") {
        LogLevel::Debug
    } else if flags.bool_flag("quiet") {
        LogLevel::Error
    } else if flags.bool_flag("silent") {
        LogLevel::Silent
    } else {
        flags.default_level().unwrap_or_default()
    }
}

/// Installs a fmt subscriber honouring `RUST_LOG` when set, falling back to
/// the given level. Calling this more than once is harmless.
pub fn init_logging(level: LogLevel) {
    if LOGGING_INIT.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    let _ = LOGGING_INIT.set(());
}
