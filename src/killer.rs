//! Termination sequencer for node-warden
//!
//! Runs the graceful-then-forceful shutdown of one process after the policy
//! engine has re-verified that it may be killed.

use std::fmt;
use std::time::Duration;

use crate::error::NodeWardenError;
use crate::process_info::ProcessTable;

/// Why a process was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// Name does not start with the target prefix
    WrongName(String),
    /// Command line contains a protected keyword
    Protected(String),
    /// Target is this tool or the shell that launched it
    SelfOrParent,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::WrongName(name) => write!(f, "not a target process ({})", name),
            Ineligibility::Protected(keyword) => {
                write!(f, "protected process (matches \"{}\")", keyword)
            }
            Ineligibility::SelfOrParent => write!(f, "belongs to this session"),
        }
    }
}

/// Result of one termination attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// Exited within the graceful window
    Terminated,
    /// Ignored the graceful request and was killed
    TimedOutThenKilled,
    /// No such process
    NotFound,
    /// Not allowed to signal the process
    AccessDenied,
    /// Refused before any signal was sent
    NotEligible(Ineligibility),
    /// Anything else
    Failed(String),
}

impl TerminationOutcome {
    /// True if the process is gone because of us
    pub fn is_kill(&self) -> bool {
        matches!(
            self,
            TerminationOutcome::Terminated | TerminationOutcome::TimedOutThenKilled
        )
    }

    /// Map a signal/wait error onto an outcome
    fn from_error(error: NodeWardenError) -> Self {
        match error {
            NodeWardenError::ProcessNotFound(_) => TerminationOutcome::NotFound,
            NodeWardenError::PermissionDenied(_) => TerminationOutcome::AccessDenied,
            other => TerminationOutcome::Failed(other.to_string()),
        }
    }
}

/// Record of one process handled during a bulk run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillResult {
    /// Target process ID
    pub pid: u32,
    /// Process name
    pub name: String,
    /// What happened
    pub outcome: TerminationOutcome,
}

/// Result of terminating every eligible process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchKillResult {
    /// Individual results, in enumeration order
    pub results: Vec<KillResult>,
    /// Processes terminated (gracefully or forcefully)
    pub killed_count: usize,
    /// Processes left alone because their command line is protected
    pub skipped_protected_count: usize,
}

/// How a bulk run ended, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSummary {
    /// Nothing was killed and nothing was skipped as protected
    NothingFound,
    /// Nothing was killed but protected processes were kept
    OnlyProtected,
    /// At least one kill
    Killed,
}

impl BatchKillResult {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result to the batch
    pub fn add(&mut self, result: KillResult) {
        if result.outcome.is_kill() {
            self.killed_count += 1;
        }
        if matches!(
            result.outcome,
            TerminationOutcome::NotEligible(Ineligibility::Protected(_))
        ) {
            self.skipped_protected_count += 1;
        }
        self.results.push(result);
    }

    /// Which of the end states this run reached
    ///
    /// Decided by the two counters alone; failed attempts do not add a state.
    pub fn summary(&self) -> BatchSummary {
        if self.killed_count > 0 {
            BatchSummary::Killed
        } else if self.skipped_protected_count > 0 {
            BatchSummary::OnlyProtected
        } else {
            BatchSummary::NothingFound
        }
    }
}

/// Sends the graceful signal, waits, and escalates
pub struct ProcessKiller<'a, P: ProcessTable> {
    table: &'a P,
    exit_timeout: Duration,
}

impl<'a, P: ProcessTable> ProcessKiller<'a, P> {
    /// Create a killer working on `table`
    pub fn new(table: &'a P, exit_timeout: Duration) -> Self {
        Self {
            table,
            exit_timeout,
        }
    }

    /// Terminate a process that has already passed eligibility checks
    ///
    /// Waits at most `exit_timeout` once; there is no wait after SIGKILL.
    pub fn kill(&self, pid: u32) -> TerminationOutcome {
        if let Err(e) = self.table.send_graceful(pid) {
            return TerminationOutcome::from_error(e);
        }

        match self.table.wait_exit(pid, self.exit_timeout) {
            Ok(true) => TerminationOutcome::Terminated,
            Ok(false) => match self.table.send_forceful(pid) {
                Ok(()) => TerminationOutcome::TimedOutThenKilled,
                // exited between the deadline and the kill
                Err(NodeWardenError::ProcessNotFound(_)) => TerminationOutcome::Terminated,
                Err(e) => TerminationOutcome::from_error(e),
            },
            Err(e) => TerminationOutcome::from_error(e),
        }
    }
}
