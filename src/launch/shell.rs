//! # Shell-backed launcher (Unix).
//!
//! [`ShellLauncher`] runs each worker as `sh -c <command>` via
//! [`tokio::process::Command`]:
//!
//! - optional `username` is resolved through `nix::unistd::User::from_name`
//!   and applied as uid/gid before exec;
//! - stdout and stderr are piped and forwarded line-by-line to the injected
//!   [`OutputSink`](crate::OutputSink) from two reader tasks;
//! - graceful termination is SIGTERM, escalation is SIGKILL, both signalled
//!   by pid so the waiting task keeps exclusive ownership of the child.
//!
//! Children are spawned with `kill_on_drop`, so a worker whose handle is
//! dropped mid-flight does not outlive the supervisor.

use std::sync::Arc;

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::{Pid, User};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::error::LaunchError;
use crate::launch::{Launch, LaunchSpec, StopHandle, Worker, WorkerExit};
use crate::output::{OutputRef, StreamKind};

/// Launcher that runs commands through a shell.
#[derive(Clone, Debug)]
pub struct ShellLauncher {
    shell: String,
}

impl ShellLauncher {
    /// Creates a launcher using the given shell binary (e.g. `"/bin/sh"`).
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellLauncher {
    /// Uses `sh` from `PATH`.
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl Launch for ShellLauncher {
    async fn launch(
        &self,
        process: &str,
        spec: &LaunchSpec,
        output: OutputRef,
    ) -> Result<Box<dyn Worker>, LaunchError> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(&spec.command)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        if let Some(username) = &spec.username {
            let user = User::from_name(username)
                .ok()
                .flatten()
                .ok_or_else(|| LaunchError::UnknownUser {
                    username: username.clone(),
                })?;
            cmd.uid(user.uid.as_raw()).gid(user.gid.as_raw());
        }

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            command: spec.command.clone(),
            source,
        })?;
        let pid = child.id();

        if let Some(stdout) = child.stdout.take() {
            forward_lines(process, StreamKind::Stdout, stdout, output.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(process, StreamKind::Stderr, stderr, output);
        }

        Ok(Box::new(ShellWorker { child, pid }))
    }
}

/// Spawns a reader task forwarding one stream's lines into the sink.
fn forward_lines(
    process: &str,
    stream: StreamKind,
    source: impl AsyncRead + Send + Unpin + 'static,
    output: OutputRef,
) {
    let name: Arc<str> = process.into();
    tokio::spawn(async move {
        let mut lines = BufReader::new(source).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            output.on_line(&name, stream, &line).await;
        }
    });
}

#[derive(Debug)]
struct ShellWorker {
    child: Child,
    pid: Option<u32>,
}

#[async_trait]
impl Worker for ShellWorker {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn stop_handle(&self) -> Arc<dyn StopHandle> {
        Arc::new(ShellStop { pid: self.pid })
    }

    async fn wait(&mut self) -> WorkerExit {
        match self.child.wait().await {
            Ok(status) => WorkerExit {
                code: status.code(),
            },
            // wait() errors are unexpected; report as signal-like termination.
            Err(_) => WorkerExit { code: None },
        }
    }
}

/// Signals a shell worker by pid. Signalling an already-reaped pid is a
/// no-op (ESRCH ignored).
struct ShellStop {
    pid: Option<u32>,
}

impl ShellStop {
    fn signal(&self, sig: Signal) {
        if let Some(pid) = self.pid.and_then(|p| i32::try_from(p).ok()) {
            let _ = signal::kill(Pid::from_raw(pid), sig);
        }
    }
}

impl StopHandle for ShellStop {
    fn terminate(&self) {
        self.signal(Signal::SIGTERM);
    }

    fn kill(&self) {
        self.signal(Signal::SIGKILL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{NullOutput, OutputFn};
    use std::sync::Mutex;

    fn spec(command: &str) -> LaunchSpec {
        LaunchSpec {
            command: command.into(),
            username: None,
        }
    }

    #[tokio::test]
    async fn clean_exit_reports_code_zero() {
        let launcher = ShellLauncher::default();
        let mut worker = launcher
            .launch("t", &spec("true"), Arc::new(NullOutput))
            .await
            .expect("spawn");
        let exit = worker.wait().await;
        assert!(exit.success());
    }

    #[tokio::test]
    async fn failing_exit_reports_nonzero_code() {
        let launcher = ShellLauncher::default();
        let mut worker = launcher
            .launch("t", &spec("exit 3"), Arc::new(NullOutput))
            .await
            .expect("spawn");
        let exit = worker.wait().await;
        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
    }

    #[tokio::test]
    async fn unknown_shell_is_a_spawn_error() {
        let launcher = ShellLauncher::new("/definitely/not/a/shell");
        let err = launcher
            .launch("t", &spec("true"), Arc::new(NullOutput))
            .await
            .expect_err("must fail");
        assert_eq!(err.as_label(), "launch_spawn_failed");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_before_spawn() {
        let launcher = ShellLauncher::default();
        let bad = LaunchSpec {
            command: "true".into(),
            username: Some("procvisor-no-such-user".into()),
        };
        let err = launcher
            .launch("t", &bad, Arc::new(NullOutput))
            .await
            .expect_err("must fail");
        assert_eq!(err.as_label(), "launch_unknown_user");
    }

    #[tokio::test]
    async fn stdout_lines_reach_the_sink() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let inner = seen.clone();
        let sink = OutputFn::arc(move |_proc, _stream, line| {
            inner.lock().unwrap().push(line.to_string());
        });

        let launcher = ShellLauncher::default();
        let mut worker = launcher
            .launch("echoer", &spec("echo hello"), sink)
            .await
            .expect("spawn");
        worker.wait().await;

        // Reader tasks may still be draining after wait() returns.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(seen.lock().unwrap().as_slice(), ["hello".to_string()]);
    }

    #[tokio::test]
    async fn terminate_stops_a_long_running_worker() {
        let launcher = ShellLauncher::default();
        let mut worker = launcher
            .launch("sleeper", &spec("sleep 30"), Arc::new(NullOutput))
            .await
            .expect("spawn");
        let stop = worker.stop_handle();
        stop.terminate();
        let exit = worker.wait().await;
        // Killed by signal: no exit code.
        assert_eq!(exit.code, None);
    }
}
