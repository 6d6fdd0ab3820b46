//! Process termination.
//!
//! Sends SIGTERM rather than SIGKILL so the target gets a chance to clean
//! up. Failure is classified from errno so the status line can tell "no
//! such process" apart from "access denied".

/// Result of a termination attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateOutcome {
    /// SIGTERM was delivered.
    Terminated,
    /// No process with that PID exists.
    NotFound,
    /// The caller lacks permission to signal the target.
    AccessDenied,
    /// Signaling is not available on this platform.
    Unsupported,
}

/// Attempts to terminate the process with the given PID.
#[cfg(unix)]
#[must_use]
pub fn terminate(pid: u32) -> TerminateOutcome {
    // kill(2) gives pid 0 a special meaning: signal the caller's own
    // process group. No real process is addressable as 0, so refuse it
    // instead of terminating ourselves.
    if pid == 0 {
        return TerminateOutcome::NotFound;
    }

    // PIDs above i32::MAX cannot exist; treat them as not found rather
    // than letting the cast wrap into a valid PID.
    let Ok(pid) = i32::try_from(pid) else {
        return TerminateOutcome::NotFound;
    };

    // SAFETY: kill(2) with a plain signal number has no memory-safety
    // preconditions; it only needs a valid signal constant.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        return TerminateOutcome::Terminated;
    }

    match std::io::Error::last_os_error().raw_os_error() {
        Some(libc::ESRCH) => TerminateOutcome::NotFound,
        Some(libc::EPERM) => TerminateOutcome::AccessDenied,
        _ => TerminateOutcome::NotFound,
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn terminate(_pid: u32) -> TerminateOutcome {
    TerminateOutcome::Unsupported
}
