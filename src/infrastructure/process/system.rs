//! System Command Runner
//!
//! Spawns real processes with a bounded wall-clock timeout. Captured output
//! is drained on helper threads so a chatty child can never fill its pipe and
//! stall; the calling thread owns the `Child` and polls `try_wait` until the
//! deadline, then kills and reaps it.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::ports::{CommandOutput, CommandRunner, CommandSpec, OutputMode, ProcessError};

/// Poll interval while waiting for a child
const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// Upper bound on waiting for a killed child to be reaped
const REAP_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs commands on the local host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null());

        match spec.output {
            OutputMode::Capture => {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
            OutputMode::Stream => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
        }

        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = wait_with_deadline(&mut child, spec)?;

        Ok(CommandOutput {
            code: status.code(),
            stdout: stdout.map(join_output).unwrap_or_default(),
            stderr: stderr.map(join_output).unwrap_or_default(),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_output(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

fn wait_with_deadline(child: &mut Child, spec: &CommandSpec) -> Result<ExitStatus, ProcessError> {
    let deadline = Instant::now() + spec.timeout;
    let io_error = |source| ProcessError::Io {
        command: spec.display(),
        source,
    };

    loop {
        if let Some(status) = child.try_wait().map_err(io_error)? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    tracing::warn!(command = %spec.display(), timeout_secs = spec.timeout.as_secs(), "command timed out, killing");
    let _ = child.kill();

    let reap_deadline = Instant::now() + REAP_TIMEOUT;
    while Instant::now() < reap_deadline {
        if child.try_wait().map_err(io_error)?.is_some() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    Err(ProcessError::TimedOut {
        command: spec.display(),
        timeout: spec.timeout,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> CommandSpec {
        CommandSpec::new("sh", timeout).args(["-c", script])
    }

    #[test]
    fn captures_stdout_stderr_and_exit_code() {
        let output = SystemRunner::new()
            .run(&sh("echo out; echo err >&2; exit 3", Duration::from_secs(10)))
            .unwrap();

        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let spec = CommandSpec::new("berth-definitely-not-installed", Duration::from_secs(1));
        let err = SystemRunner::new().run(&spec).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[test]
    fn slow_command_times_out() {
        let started = Instant::now();
        let err = SystemRunner::new()
            .run(&sh("sleep 30", Duration::from_millis(200)))
            .unwrap_err();

        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn large_output_does_not_block() {
        let output = SystemRunner::new()
            .run(&sh(
                "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done",
                Duration::from_secs(30),
            ))
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.lines().count(), 20000);
    }
}
