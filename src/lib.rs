//! devrun: a run-lifecycle harness for developer CLI tools.
//!
//! One call to [`run`] owns the whole lifecycle of a command invocation:
//! parse arguments, configure logging, execute the user callback inside a
//! supervised child-process scope, drain registered cleanup tasks exactly
//! once, report invocation metrics, and translate failures into the process
//! exit status.
//!
//! ```no_run
//! use devrun::{run, FlagOptions, RunOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = RunOptions::new()
//!         .usage("my-tool [...options]")
//!         .description("Does the thing")
//!         .flags(FlagOptions::new().string("output"));
//!
//!     run(
//!         |context| async move {
//!             let output = context.flags_reader().required_string("output")?;
//!             tracing::info!(output, "doing the thing");
//!             Ok(())
//!         },
//!         options,
//!     )
//!     .await
//! }
//! ```

pub mod flags;
pub mod log;
pub mod proc;
pub mod runtime;

pub use flags::bag::{parse, FlagValue, Flags};
pub use flags::reader::{FlagError, FlagsReader};
pub use flags::schema::{default_flag_aliases, merged_aliases, FlagOptions};
pub use log::{init_logging, pick_level_from_flags, LogLevel};
pub use proc::command::ProcCommand;
pub use proc::runner::{with_proc_runner, ProcRunner};
pub use runtime::cleanup::{Cleanup, CleanupTask};
pub use runtime::help::get_help;
pub use runtime::metrics::{Metrics, MetricsMeta, METRICS_PATH_ENV};
pub use runtime::options::{LogOptions, RunOptions};
pub use runtime::runner::{run, run_with_argv, RunContext};
