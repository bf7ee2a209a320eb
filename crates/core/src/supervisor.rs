use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info, warn};

use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::error::{Error, Result};
use crate::request::ExecutionRequest;

/// Interval between two progress ticks while the tool runs
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

/// Exit code reported when the tool could not be started at all
const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code reported when the tool was killed by a signal
const SIGNAL_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// How a finished run ended. `captured_output` holds the tool's combined
/// stdout and stderr and is only kept for failed runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub captured_output: Option<String>,
}

impl ExecutionResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the tool on a background thread and polls it from the caller's
/// thread, calling back once per poll interval while it is still running.
///
/// `run` takes `&mut self`, so one supervisor drives at most one run at a time.
#[derive(Debug)]
pub struct Supervisor {
    poll_interval: Duration,
    state: SupervisorState,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: SupervisorState::Idle,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs `request` to completion, calling `on_tick` every poll interval
    /// that passes without the tool finishing.
    ///
    /// There is no cancellation: once launched the tool runs until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Execution`] with the captured output when the tool
    /// exits non-zero or cannot be launched, and [`Error::Stdio`] if the
    /// background thread cannot be spawned.
    pub fn run<F: FnMut()>(
        &mut self,
        request: &ExecutionRequest,
        mut on_tick: F,
    ) -> Result<ExecutionResult> {
        self.state = SupervisorState::Running;
        info!("Executing command:\n{request}");

        let command = request.to_command();
        let result_slot: Arc<Mutex<Option<ExecutionResult>>> = Arc::new(Mutex::new(None));
        let (done_sender, done_receiver) = crossbeam_channel::bounded::<()>(1);

        let worker_slot = Arc::clone(&result_slot);
        let spawned = thread::Builder::new()
            .name("guetzli-export-run".to_string())
            .spawn(move || {
                let result = run_to_completion(command);
                match worker_slot.lock() {
                    Ok(mut slot) => *slot = Some(result),
                    Err(poisoned) => *poisoned.into_inner() = Some(result),
                }
                // The receiver only goes away if the controller already gave up.
                let _ = done_sender.send(());
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => return self.finish(Err(Error::Stdio(e))),
        };

        loop {
            match done_receiver.recv_timeout(self.poll_interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => on_tick(),
            }
        }

        if handle.join().is_err() {
            warn!("Background run thread panicked");
        }

        let result = match result_slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        let outcome = match result {
            Some(result) if result.success() => Ok(result),
            Some(result) => {
                error!("Sub process failed with exit code {}", result.exit_code);
                Err(Error::execution(
                    result.exit_code,
                    result.captured_output.unwrap_or_default(),
                ))
            }
            None => Err(Error::Misc(
                "The background run ended without a result".to_string(),
            )),
        };

        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Result<ExecutionResult>) -> Result<ExecutionResult> {
        self.state = if outcome.is_ok() {
            SupervisorState::Succeeded
        } else {
            SupervisorState::Failed
        };
        debug!("Run finished: {:?}", self.state);
        outcome
    }
}

fn run_to_completion(mut command: Command) -> ExecutionResult {
    let program = command.get_program().to_string_lossy().to_string();
    let command = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    match command.output() {
        Ok(output) if output.status.success() => ExecutionResult {
            exit_code: 0,
            captured_output: None,
        },
        Ok(output) => {
            let mut captured = String::from_utf8_lossy(&output.stdout).to_string();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));

            ExecutionResult {
                exit_code: output.status.code().unwrap_or(SIGNAL_EXIT_CODE),
                captured_output: Some(captured),
            }
        }
        Err(e) => ExecutionResult {
            exit_code: LAUNCH_FAILURE_EXIT_CODE,
            captured_output: Some(format!("Failed to launch `{program}`: {e}")),
        },
    }
}
