//! Time-bounded test execution.
//!
//! The harness writes the submission plus a synthesized test driver to a
//! temporary file, runs the interpreter on it as a child process and counts
//! the passing lines it prints. The child is killed when the wall-clock
//! budget runs out; whatever it printed before that still counts.

pub mod wrapper;

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::SandboxConfig;
use crate::core::{Error, Language, Result, TestCase};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long readers may take to hit end of file once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Outcome of one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessReport {
    /// Tests whose comparison printed a pass.
    pub passed: usize,
    /// Tests submitted.
    pub total: usize,
    /// Whether the child was killed on timeout.
    pub timed_out: bool,
}

impl HarnessReport {
    /// Pass rate as a percentage, `None` when there were no tests.
    pub fn pass_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.passed as f64 / self.total as f64 * 100.0)
    }
}

/// Runs test cases against a submission in a child interpreter.
#[derive(Debug, Clone)]
pub struct Harness {
    interpreter: String,
    timeout: Duration,
}

impl Harness {
    /// Create a harness from sandbox configuration.
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `test_cases` against `source`.
    ///
    /// Languages without an interpreter pass nothing. Errors are returned only
    /// for infrastructure failures: the temp file, spawning, or reading output.
    pub fn run(
        &self,
        source: &str,
        language: Language,
        test_cases: &[TestCase],
    ) -> Result<HarnessReport> {
        let total = test_cases.len();
        if total == 0 || !language.is_executable() {
            return Ok(HarnessReport {
                passed: 0,
                total,
                timed_out: false,
            });
        }

        let program = wrapper::python_program(source, test_cases);

        // Removed on drop, on every exit path.
        let mut script = tempfile::Builder::new()
            .prefix("critique-")
            .suffix(".py")
            .tempfile()?;
        script.write_all(program.as_bytes())?;
        script.flush()?;

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let execution = execute_with_timeout(&mut cmd, self.timeout)?;
        if !execution.stderr.is_empty() {
            tracing::debug!("Sandbox stderr: {}", execution.stderr.trim_end());
        }
        if execution.timed_out {
            tracing::warn!(
                "{}; unreported tests count as failed",
                Error::SandboxTimeout(self.timeout)
            );
        }

        Ok(HarnessReport {
            passed: wrapper::count_passes(&execution.stdout, total),
            total,
            timed_out: execution.timed_out,
        })
    }
}

/// Captured output of a bounded child process.
#[derive(Debug, Default)]
struct Execution {
    stdout: String,
    stderr: String,
    timed_out: bool,
}

/// Run a command, killing it once `timeout` has elapsed.
///
/// Pipes are drained on background threads so a chatty child cannot block
/// on a full pipe while the budget is being polled. The child leads its own
/// process group, and the whole group is killed when it finishes or times
/// out. Readers get [`DRAIN_GRACE`] past that point to reach end of file;
/// whatever they have buffered by then is the captured output.
fn execute_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Execution> {
    let start = Instant::now();

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::sandbox(format!("failed to start interpreter: {e}")))?;

    let stdout = OutputReader::spawn(child.stdout.take());
    let stderr = OutputReader::spawn(child.stderr.take());

    let timed_out = loop {
        match child.try_wait() {
            Ok(Some(_)) => break false,
            Ok(None) => {
                if start.elapsed() > timeout {
                    break true;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                kill(&mut child);
                return Err(Error::sandbox(format!("failed to wait on interpreter: {e}")));
            }
        }
    };
    // Also reaps anything the submission left running in the background.
    kill(&mut child);

    let deadline = Instant::now() + DRAIN_GRACE;
    Ok(Execution {
        stdout: stdout.finish(deadline),
        stderr: stderr.finish(deadline),
        timed_out,
    })
}

/// Kill the child's process group, then the child itself, and reap it.
fn kill(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: plain signal delivery to the group the child leads.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Accumulates a pipe's bytes on a background thread.
struct OutputReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: Option<Receiver<()>>,
}

impl OutputReader {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let done = pipe.map(|mut pipe| {
            let (tx, rx) = mpsc::channel();
            let sink = Arc::clone(&buffer);
            std::thread::spawn(move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => sink.lock().extend_from_slice(&chunk[..n]),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::debug!("Sandbox pipe read failed: {e}");
                            break;
                        }
                    }
                }
                let _ = tx.send(());
            });
            rx
        });
        Self { buffer, done }
    }

    /// Wait for end of file until `deadline`, then take what was read.
    fn finish(self, deadline: Instant) -> String {
        if let Some(done) = self.done {
            let wait = deadline.saturating_duration_since(Instant::now());
            if done.recv_timeout(wait).is_err() {
                tracing::debug!("Sandbox output still open after kill, keeping partial output");
            }
        }
        let bytes = std::mem::take(&mut *self.buffer.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Whether `interpreter` can be started at all.
pub fn interpreter_available(interpreter: &str) -> bool {
    Command::new(interpreter)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
