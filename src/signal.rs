//! Signal delivery for node-warden
//!
//! Maps the graceful/forceful termination steps onto Unix signals using nix,
//! and installs the SIGINT handler for the interactive session.

use crate::error::NodeWardenError;
use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal as NixSignal};
use nix::unistd::Pid;

/// Line printed when the operator presses Ctrl-C
const INTERRUPT_MESSAGE: &[u8] = b"\nInterrupted by user.\n";

/// Signals used by the termination sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    /// SIGTERM (15) - graceful request
    #[default]
    SIGTERM,
    /// SIGKILL (9) - cannot be caught
    SIGKILL,
}

impl Signal {
    /// Signal sent first, which the process may handle
    pub fn graceful() -> Self {
        Signal::SIGTERM
    }

    /// Signal sent once the graceful window has elapsed
    pub fn forceful() -> Self {
        Signal::SIGKILL
    }

    fn to_nix(self) -> NixSignal {
        match self {
            Signal::SIGTERM => NixSignal::SIGTERM,
            Signal::SIGKILL => NixSignal::SIGKILL,
        }
    }

    /// Get signal name
    pub fn name(&self) -> &'static str {
        match self {
            Signal::SIGTERM => "SIGTERM",
            Signal::SIGKILL => "SIGKILL",
        }
    }
}

/// Signal sender for Unix processes
pub struct SignalSender;

impl SignalSender {
    /// Convert a PID to a nix Pid, refusing values that would turn negative
    ///
    /// A negative pid passed to kill(2) addresses a whole process group.
    fn to_nix_pid(pid: u32) -> Result<Pid, NodeWardenError> {
        match i32::try_from(pid) {
            Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
            _ => Err(NodeWardenError::InvalidInput(format!(
                "PID {} is out of range",
                pid
            ))),
        }
    }

    /// Send signal to process
    pub fn send(pid: u32, signal: Signal) -> Result<(), NodeWardenError> {
        let nix_pid = Self::to_nix_pid(pid)?;

        signal::kill(nix_pid, signal.to_nix()).map_err(|e| match e {
            Errno::ESRCH => NodeWardenError::ProcessNotFound(pid),
            Errno::EPERM => NodeWardenError::PermissionDenied(pid),
            _ => NodeWardenError::Unexpected(format!(
                "Failed to send {}: {}",
                signal.name(),
                e
            )),
        })
    }

    /// Check whether a PID still names a process (signal 0)
    ///
    /// EPERM means the process exists but belongs to someone else.
    pub fn exists(pid: u32) -> bool {
        let Ok(nix_pid) = Self::to_nix_pid(pid) else {
            return false;
        };

        match signal::kill(nix_pid, None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}

extern "C" fn handle_interrupt(_: libc::c_int) {
    // Only async-signal-safe calls here: a raw write and _exit.
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            INTERRUPT_MESSAGE.as_ptr().cast(),
            INTERRUPT_MESSAGE.len(),
        );
        libc::_exit(1);
    }
}

/// Make Ctrl-C print "Interrupted by user." and exit with status 1
///
/// The handler exits directly; a blocked `read_line` restarts on EINTR and
/// would never observe a flag.
pub fn install_interrupt_handler() -> Result<(), NodeWardenError> {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe { signal::sigaction(NixSignal::SIGINT, &action) }
        .map(|_| ())
        .map_err(|e| {
            NodeWardenError::Unexpected(format!("Failed to install SIGINT handler: {}", e))
        })
}
