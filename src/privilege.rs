//! Elevated-privilege detection
//!
//! Running unprivileged is fine; some terminations may just fail with
//! permission errors, so the operator gets a one-time hint.

use nix::unistd::geteuid;

/// Advisory printed once at startup when not running as root
pub const UNPRIVILEGED_HINT: &str =
    "Note: running without root privileges; terminating some processes may fail.";

/// True when the effective user is root
pub fn is_elevated() -> bool {
    geteuid().is_root()
}

/// The startup advisory, if one applies
pub fn advisory() -> Option<&'static str> {
    if is_elevated() {
        None
    } else {
        Some(UNPRIVILEGED_HINT)
    }
}
