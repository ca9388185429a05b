use crate::flags::schema::FlagOptions;
use crate::log::LogLevel;

/// Logging configuration for one invocation.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub default_level: Option<LogLevel>,
}

/// Configuration accepted by [`run`](crate::runtime::runner::run).
///
/// `usage` and `description` feed the help text; `log.default_level` applies
/// when the invoker passes no verbosity flag; `flags` declares the command's
/// schema.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub usage: Option<String>,
    pub description: Option<String>,
    pub log: LogOptions,
    pub flags: FlagOptions,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_log_level(mut self, level: LogLevel) -> Self {
        self.log.default_level = Some(level);
        self
    }

    pub fn flags(mut self, flags: FlagOptions) -> Self {
        self.flags = flags;
        self
    }
}
