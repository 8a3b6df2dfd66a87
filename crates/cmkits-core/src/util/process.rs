//! Process execution utilities.

use async_trait::async_trait;
use cmkits_types::{KitError, ProcessOutput, ProcessRunner, Result, RunOptions};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// [`ProcessRunner`] backed by `tokio::process`.
///
/// Every child is spawned with `kill_on_drop`, so a timeout or a cancellation
/// kills the process instead of leaking it.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    cancel: CancellationToken,
    default_timeout: Option<Duration>,
}

impl TokioProcessRunner {
    /// Create a runner with no default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort in-flight and future runs when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Timeout applied when [`RunOptions::timeout`] is not set.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// The token that cancels this runner's processes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn command(program: &Path, args: &[String], options: &RunOptions) -> tokio::process::Command {
        let mut cmd = if options.shell {
            shell_command(program, args)
        } else {
            let mut cmd = tokio::process::Command::new(program);
            cmd.args(args);
            cmd
        };

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Join program and arguments into one line for the platform shell.
///
/// Arguments are passed through untouched so callers can use pipes; only a
/// program path containing spaces is quoted.
fn shell_line(program: &Path, args: &[String]) -> String {
    let program = program.to_string_lossy();
    let mut line = if program.contains(' ') && !program.starts_with('"') {
        format!("\"{}\"", program)
    } else {
        program.to_string()
    };
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(windows)]
fn shell_command(program: &Path, args: &[String]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd.exe");
    cmd.arg("/c").raw_arg(shell_line(program, args));
    cmd
}

#[cfg(not(windows))]
fn shell_command(program: &Path, args: &[String]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c").arg(shell_line(program, args));
    cmd
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
    ) -> Result<ProcessOutput> {
        if self.cancel.is_cancelled() {
            return Err(KitError::Cancelled);
        }

        debug!("Executing {:?} {:?}", program, args);

        let child = Self::command(program, args, options)
            .spawn()
            .map_err(|source| KitError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let timeout = options.timeout.or(self.default_timeout);
        let deadline = async {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = self.cancel.cancelled() => {
                debug!("Cancelled {:?}", program);
                return Err(KitError::Cancelled);
            }
            _ = deadline => {
                return Err(KitError::Timeout {
                    program: program.to_path_buf(),
                    after: timeout.unwrap_or_default(),
                });
            }
        };

        let result = ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        trace!("{:?} exited with {}", program, result.exit_code);

        Ok(result)
    }
}

/// Execute a command once with a throwaway runner.
pub async fn run(program: impl AsRef<Path>, args: &[&str]) -> Result<ProcessOutput> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    TokioProcessRunner::new()
        .run(program.as_ref(), &args, &RunOptions::default())
        .await
}
