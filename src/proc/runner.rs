use crate::proc::command::ProcCommand;
use anyhow::{bail, Context, Result};
use futures::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to the supervision scope's process registry.
///
/// Cloning is cheap; every clone shares the same shutdown token and ledger
/// of background children, so [`with_proc_runner`] can reconcile all of them
/// when the scope closes.
#[derive(Clone)]
pub struct ProcRunner {
    inner: Arc<ProcInner>,
}

struct ProcInner {
    shutdown: CancellationToken,
    background: Mutex<Vec<BackgroundProc>>,
}

struct BackgroundProc {
    name: String,
    handle: JoinHandle<Result<()>>,
}

impl ProcRunner {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ProcInner {
                shutdown: CancellationToken::new(),
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Runs a child process to completion, forwarding its output through
    /// tracing. A non-zero exit status is an error.
    pub async fn run(&self, name: &str, command: ProcCommand) -> Result<()> {
        command.validate()?;
        supervise(name.to_string(), command, self.inner.shutdown.clone()).await
    }

    /// Starts a child process in the background. It keeps running until it
    /// exits on its own or the scope tears down, whichever comes first; its
    /// outcome is collected during teardown.
    pub fn spawn(&self, name: &str, command: ProcCommand) -> Result<()> {
        command.validate()?;
        let handle = tokio::spawn(supervise(
            name.to_string(),
            command,
            self.inner.shutdown.clone(),
        ));
        self.inner
            .background
            .lock()
            .expect("proc ledger poisoned")
            .push(BackgroundProc {
                name: name.to_string(),
                handle,
            });
        Ok(())
    }

    /// Cancels the scope and reconciles every background child. Children
    /// still running are killed and reaped; a child that already failed
    /// surfaces its error here. Safe to call more than once.
    pub(crate) async fn teardown(&self) -> Result<()> {
        self.inner.shutdown.cancel();
        let procs: Vec<BackgroundProc> = self
            .inner
            .background
            .lock()
            .expect("proc ledger poisoned")
            .drain(..)
            .collect();

        let names: Vec<String> = procs.iter().map(|proc| proc.name.clone()).collect();
        let results = join_all(procs.into_iter().map(|proc| proc.handle)).await;

        let mut first_failure = None;
        for (name, joined) in names.into_iter().zip(results) {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::error!(proc = %name, error = %error, "supervised process failed");
                    if first_failure.is_none() {
                        first_failure = Some(error);
                    }
                }
                Err(join_error) => {
                    tracing::error!(proc = %name, error = %join_error, "supervision task panicked");
                    if first_failure.is_none() {
                        first_failure = Some(join_error.into());
                    }
                }
            }
        }

        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

async fn supervise(name: String, command: ProcCommand, shutdown: CancellationToken) -> Result<()> {
    let mut child = command
        .build()
        .spawn()
        .with_context(|| format!("failed to spawn process \"{name}\""))?;

    if let Some(stdout) = child.stdout.take() {
        forward_output(name.clone(), stdout, false);
    }
    if let Some(stderr) = child.stderr.take() {
        forward_output(name.clone(), stderr, true);
    }

    tokio::select! {
        status = child.wait() => {
            let status = status.with_context(|| format!("failed waiting for process \"{name}\""))?;
            if status.success() {
                tracing::debug!(proc = %name, "process completed");
                Ok(())
            } else {
                bail!("process \"{name}\" exited with {status}");
            }
        }
        _ = shutdown.cancelled() => {
            tracing::warn!(proc = %name, "scope closing; killing lingering process");
            let _ = child.start_kill();
            let _ = child.wait().await;
            Ok(())
        }
    }
}

fn forward_output(
    name: String,
    stream: impl tokio::io::AsyncRead + Unpin + Send + 'static,
    is_stderr: bool,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if is_stderr {
                tracing::warn!(proc = %name, "{line}");
            } else {
                tracing::info!(proc = %name, "{line}");
            }
        }
    });
}

/// Opens a supervision scope, runs the async body with a [`ProcRunner`]
/// handle, and tears the scope down on every exit path. The body's error
/// wins over a teardown error when both fail.
pub async fn with_proc_runner<F, Fut, T>(body: F) -> Result<T>
where
    F: FnOnce(ProcRunner) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let runner = ProcRunner::new();
    let result = body(runner.clone()).await;
    let teardown = runner.teardown().await;

    match (result, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(error), _) => Err(error),
        (Ok(_), Err(error)) => Err(error),
    }
}
