//! Running the redlines executable and capturing its output.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{EngineError, EngineResult};

/// Poll interval while waiting on a process with a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit status and decoded output of a finished process.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Spawns `cmd` with both output streams piped and waits for it.
///
/// Both pipes are drained on their own threads so a child that fills one
/// stream cannot block on the other. With no `timeout` this waits for as
/// long as the child runs.
///
/// On timeout the child is killed and the drain threads are detached rather
/// than joined: a grandchild that inherited the pipes would otherwise hold
/// the call open past its deadline. Each thread exits once the last writer
/// closes its end.
pub fn run_captured(mut cmd: Command, timeout: Option<Duration>) -> EngineResult<Captured> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(EngineError::SpawnFailed)?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        Some(timeout) => match wait_with_timeout(&mut child, timeout) {
            Ok(status) => status,
            Err(e) => {
                drop((stdout, stderr));
                return Err(e);
            }
        },
        None => child.wait().map_err(EngineError::SpawnFailed)?,
    };

    Ok(Captured {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn collect(handle: JoinHandle<Vec<u8>>) -> String {
    let bytes = handle.join().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> EngineResult<ExitStatus> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::Timeout { timeout });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(EngineError::SpawnFailed(e)),
        }
    }
}

/// Maps captured text to `None` when the stream was empty.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", script]);
        cmd
    }

    #[test]
    fn test_captures_both_streams() {
        let captured = run_captured(sh("echo out; echo err 1>&2"), None).unwrap();
        assert!(captured.status.success());
        assert_eq!(captured.stdout, "out\n");
        assert_eq!(captured.stderr, "err\n");
    }

    #[test]
    fn test_captures_output_on_failure() {
        let captured = run_captured(sh("echo boom 1>&2; exit 3"), None).unwrap();
        assert_eq!(captured.status.code(), Some(3));
        assert_eq!(captured.stderr, "boom\n");
        assert!(captured.stdout.is_empty());
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let captured = run_captured(
            sh("head -c 200000 /dev/zero | tr '\\0' a; head -c 200000 /dev/zero | tr '\\0' b 1>&2"),
            Some(Duration::from_secs(20)),
        )
        .unwrap();
        assert_eq!(captured.stdout.len(), 200_000);
        assert_eq!(captured.stderr.len(), 200_000);
    }

    #[test]
    fn test_timeout_kills_child() {
        let err = run_captured(sh("sleep 5"), Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }));
    }

    #[test]
    fn test_timeout_not_held_by_grandchild_pipes() {
        let start = Instant::now();
        let err = run_captured(
            sh("sleep 5 & echo started; sleep 5"),
            Some(Duration::from_millis(200)),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_spawn_failure() {
        let err = run_captured(Command::new("/nonexistent/redlines"), None).unwrap_err();
        assert!(matches!(err, EngineError::SpawnFailed(_)));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
