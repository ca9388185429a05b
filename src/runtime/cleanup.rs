use crate::flags::reader::FlagError;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

/// Zero-argument callable registered to run during teardown.
pub type CleanupTask = Box<dyn FnOnce() + Send + 'static>;

/// Owned cleanup registry for one invocation.
///
/// Tasks registered through [`add`](Cleanup::add) are drained exactly once,
/// in registration order, no matter how many times [`execute`](Cleanup::execute)
/// runs or which exit path triggered it. The registry also owns the exit-code
/// decision: once an error passes through [`execute_with_error`](Cleanup::execute_with_error),
/// the invocation can no longer exit zero.
pub struct Cleanup {
    help_text: String,
    state: Mutex<CleanupState>,
}

#[derive(Default)]
struct CleanupState {
    tasks: Vec<CleanupTask>,
    drained: bool,
    exit_code: Option<i32>,
}

impl Cleanup {
    pub fn new(help_text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            help_text: help_text.into(),
            state: Mutex::new(CleanupState::default()),
        })
    }

    /// Registers a cleanup task. A task added after the registry already
    /// drained runs immediately so it is never silently dropped.
    pub fn add(&self, task: CleanupTask) {
        {
            let mut state = self.state.lock().expect("cleanup state poisoned");
            if !state.drained {
                state.tasks.push(task);
                return;
            }
        }
        tracing::warn!("cleanup already ran; executing task immediately");
        run_task(task);
    }

    /// Runs all registered tasks if they have not already run; a no-op
    /// otherwise.
    pub fn execute(&self) {
        self.drain();
    }

    /// Logs the error, marks the invocation failed, and drains the tasks.
    ///
    /// A flag-format error additionally writes the help text to stdout so
    /// the user sees the valid surface next to the complaint.
    pub fn execute_with_error(&self, error: &anyhow::Error) {
        {
            let mut state = self.state.lock().expect("cleanup state poisoned");
            state.exit_code.get_or_insert(1);
        }

        if let Some(flag_error) = error.downcast_ref::<FlagError>() {
            tracing::error!("{flag_error}");
            println!("{}", self.help_text);
        } else {
            tracing::error!("FATAL ERROR: {error:#}");
        }

        self.drain();
    }

    /// `Some` once an error passed through this registry.
    pub fn exit_code(&self) -> Option<i32> {
        self.state.lock().expect("cleanup state poisoned").exit_code
    }

    fn drain(&self) {
        let tasks = {
            let mut state = self.state.lock().expect("cleanup state poisoned");
            if state.drained {
                return;
            }
            state.drained = true;
            std::mem::take(&mut state.tasks)
        };
        for task in tasks {
            run_task(task);
        }
    }
}

fn run_task(task: CleanupTask) {
    // A panicking task must not stop the remaining tasks from running.
    if std::panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
        tracing::error!("cleanup task panicked");
    }
}
