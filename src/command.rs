use crate::env::Environment;
use std::fs::File;
use std::io::{self, Write};
use std::process::{ExitStatus, Stdio};

/// Signed status reported for one command line.
///
/// `0` is success. Negative values are failures: `-1` for a builtin that
/// failed, `-code` for a child that exited with `code` and `-128 - n` for a
/// child killed by signal `n`.
pub type ExitCode = i32;

/// Reported when no program could be started for a command name.
pub const SPAWN_FAILED: ExitCode = -127;

/// Outcome of running one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// A builtin or the redirection setup reported an error.
    Failed,
    /// A child process exited normally with this code.
    Exited(i32),
    /// A child process was terminated by this signal.
    Signaled(i32),
    /// The program could not be located or started.
    SpawnFailed,
}

impl Status {
    /// The signed [`ExitCode`] encoding of this status.
    pub fn code(self) -> ExitCode {
        match self {
            Status::Success => 0,
            Status::Failed => -1,
            Status::Exited(code) => -code,
            Status::Signaled(signal) => -128 - signal,
            Status::SpawnFailed => SPAWN_FAILED,
        }
    }

    pub fn is_success(self) -> bool {
        self.code() == 0
    }
}

impl From<ExitStatus> for Status {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Status::Exited(code);
        }
        terminated_by_signal(status)
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> Status {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => Status::Signaled(signal),
        None => Status::Failed,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> Status {
    Status::Failed
}

/// Destination for command output that a child process can also write to.
///
/// `stdio` returns `None` when the destination has no OS handle; the child's
/// output is then relayed through a pipe and written here.
pub trait Stdout: Write {
    fn stdio(&self) -> io::Result<Option<Stdio>>;
}

impl Stdout for io::Stdout {
    fn stdio(&self) -> io::Result<Option<Stdio>> {
        Ok(Some(Stdio::inherit()))
    }
}

impl Stdout for File {
    fn stdio(&self) -> io::Result<Option<Stdio>> {
        Ok(Some(self.try_clone()?.into()))
    }
}

impl Stdout for Vec<u8> {
    fn stdio(&self) -> io::Result<Option<Stdio>> {
        Ok(None)
    }
}

/// Everything a command touches while it runs.
pub struct Invocation<'a> {
    /// The active output target, possibly redirected to a file.
    pub out: &'a mut dyn Stdout,
    /// Diagnostic output. Never redirected.
    pub err: &'a mut dyn Write,
    pub env: &'a mut Environment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_encoding() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::Failed.code(), -1);
        assert_eq!(Status::Exited(0).code(), 0);
        assert_eq!(Status::Exited(1).code(), -1);
        assert_eq!(Status::Exited(42).code(), -42);
        assert_eq!(Status::Signaled(9).code(), -137);
        assert_eq!(Status::SpawnFailed.code(), SPAWN_FAILED);
    }

    #[test]
    fn test_exited_zero_is_success() {
        assert!(Status::Exited(0).is_success());
        assert!(!Status::Exited(3).is_success());
        assert!(!Status::Signaled(15).is_success());
    }

    #[test]
    #[cfg(unix)]
    fn test_from_exit_status() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(Status::from(ExitStatus::from_raw(0)), Status::Exited(0));
        assert_eq!(Status::from(ExitStatus::from_raw(2 << 8)), Status::Exited(2));
        assert_eq!(Status::from(ExitStatus::from_raw(9)), Status::Signaled(9));
    }
}
