use crate::flags::bag::{parse, Flags};
use crate::flags::reader::{FlagError, FlagsReader};
use crate::flags::schema::merged_aliases;
use crate::log::{init_logging, pick_level_from_flags};
use crate::proc::runner::{with_proc_runner, ProcRunner};
use crate::runtime::cleanup::{Cleanup, CleanupTask};
use crate::runtime::help::get_help;
use crate::runtime::metrics::{Metrics, MetricsMeta};
use crate::runtime::options::RunOptions;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

/// Immutable view handed to the user callback, constructed once per
/// invocation after flags and logging are ready.
pub struct RunContext {
    flags: Arc<Flags>,
    flags_reader: FlagsReader,
    proc_runner: ProcRunner,
    stats_meta: MetricsMeta,
    cleanup: Arc<Cleanup>,
}

impl RunContext {
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn flags_reader(&self) -> &FlagsReader {
        &self.flags_reader
    }

    pub fn proc_runner(&self) -> &ProcRunner {
        &self.proc_runner
    }

    pub fn stats_meta(&self) -> &MetricsMeta {
        &self.stats_meta
    }

    /// Registers a task to run during teardown, after the callback settles
    /// and the supervision scope has closed.
    pub fn add_cleanup_task(&self, task: CleanupTask) {
        self.cleanup.add(task);
    }
}

/// Runs `callback` inside the full invocation lifecycle and exits the
/// process with the resulting status code. Never returns.
pub async fn run<F, Fut>(callback: F, options: RunOptions)
where
    F: FnOnce(RunContext) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let code = run_with_argv(argv, callback, options).await;
    std::process::exit(code)
}

/// The testable core of [`run`]: same lifecycle, explicit argv, and the exit
/// status returned instead of applied.
///
/// Lifecycle, in order: parse flags, install logging, build help text,
/// short-circuit on `--help`, reject unexpected flags, invoke the callback
/// once inside a supervised process scope, drain cleanup exactly once, then
/// report the terminal metrics outcome.
pub async fn run_with_argv<F, Fut>(argv: Vec<String>, callback: F, options: RunOptions) -> i32
where
    F: FnOnce(RunContext) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let flags = parse(&argv, &options.flags, options.log.default_level);
    init_logging(pick_level_from_flags(&flags));

    let metrics = Metrics::new();
    let help_text = get_help(&options);

    if flags.help() {
        println!("{help_text}");
        return 0;
    }

    let cleanup = Cleanup::new(help_text);

    if !options.flags.allow_unexpected && !flags.unexpected().is_empty() {
        let error = anyhow::Error::from(FlagError::Unexpected {
            names: flags.unexpected().to_vec(),
        });
        cleanup.execute_with_error(&error);
        return cleanup.exit_code().unwrap_or(1);
    }

    let flags = Arc::new(flags);
    let flags_reader = FlagsReader::new(flags.clone(), merged_aliases(&options.flags));
    let stats_meta = metrics.meta().clone();
    let callback_cleanup = cleanup.clone();

    let result = with_proc_runner(move |proc_runner| {
        callback(RunContext {
            flags,
            flags_reader,
            proc_runner,
            stats_meta,
            cleanup: callback_cleanup,
        })
    })
    .await;

    let failure = match result {
        Ok(()) => None,
        Err(error) => {
            cleanup.execute_with_error(&error);
            metrics.report_error(&format!("{error:#}"));
            Some(cleanup.exit_code().unwrap_or(1))
        }
    };

    // Guaranteed final drain; a no-op when the error path already ran it.
    cleanup.execute();

    match failure {
        Some(code) => code,
        None => {
            metrics.report_success();
            0
        }
    }
}
