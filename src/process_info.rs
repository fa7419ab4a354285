//! Process table access for node-warden
//!
//! `ProcessTable` is the capability the rest of the crate needs from the OS:
//! enumerate, look up, signal and wait. `SystemProcessTable` implements it with
//! sysinfo snapshots and nix signals.

use std::thread;
use std::time::{Duration, Instant};

use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind,
};

use crate::error::NodeWardenError;
use crate::signal::{Signal, SignalSender};

/// Interval between liveness checks while waiting for exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Snapshot of one process at query time
///
/// Stale as soon as it is returned; anything acting on it must look the pid up
/// again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    /// Process ID
    pub pid: u32,
    /// Parent process ID (None if no parent or unknown)
    pub parent_pid: Option<u32>,
    /// Executable name
    pub name: String,
    /// Command line arguments (empty when unavailable)
    pub cmdline: Vec<String>,
    /// OS-reported status, e.g. "Sleeping" or "Zombie"
    pub status: String,
}

impl ProcessRecord {
    /// Command line joined with single spaces
    pub fn cmdline_text(&self) -> String {
        self.cmdline.join(" ")
    }
}

/// Operations the selector and sequencer need from the OS process table
pub trait ProcessTable {
    /// All live processes, in whatever order the OS yields them
    fn enumerate(&self) -> Vec<ProcessRecord>;

    /// Fresh lookup of a single process
    fn get(&self, pid: u32) -> Option<ProcessRecord>;

    /// Ask the process to exit
    fn send_graceful(&self, pid: u32) -> Result<(), NodeWardenError>;

    /// Kill the process unconditionally
    fn send_forceful(&self, pid: u32) -> Result<(), NodeWardenError>;

    /// Block until the process exits or `timeout` elapses; true if it exited
    fn wait_exit(&self, pid: u32, timeout: Duration) -> Result<bool, NodeWardenError>;
}

/// Get current process PID
pub fn current_pid() -> u32 {
    std::process::id()
}

/// The live OS process table
///
/// Every call takes a new snapshot; nothing is cached between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    /// Create a new SystemProcessTable
    pub fn new() -> Self {
        Self
    }

    fn refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always)
    }

    fn snapshot(pids: ProcessesToUpdate<'_>) -> System {
        let mut system = System::new();
        system.refresh_processes_specifics(pids, true, Self::refresh_kind());
        system
    }

    fn to_record(pid: Pid, proc: &Process) -> ProcessRecord {
        ProcessRecord {
            pid: pid.as_u32(),
            parent_pid: proc.parent().map(|p| p.as_u32()),
            name: proc.name().to_string_lossy().to_string(),
            cmdline: proc
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy().to_string())
                .collect(),
            status: proc.status().to_string(),
        }
    }

    /// Gone from the table, or exited but not yet reaped
    fn has_exited(pid: u32) -> bool {
        if !SignalSender::exists(pid) {
            return true;
        }

        let sysinfo_pid = Pid::from_u32(pid);
        let system = Self::snapshot(ProcessesToUpdate::Some(&[sysinfo_pid]));
        match system.process(sysinfo_pid) {
            Some(proc) => proc.status() == ProcessStatus::Zombie,
            None => true,
        }
    }
}

impl ProcessTable for SystemProcessTable {
    fn enumerate(&self) -> Vec<ProcessRecord> {
        let system = Self::snapshot(ProcessesToUpdate::All);
        system
            .processes()
            .iter()
            .filter(|(_, proc)| proc.thread_kind().is_none())
            .map(|(pid, proc)| Self::to_record(*pid, proc))
            .collect()
    }

    fn get(&self, pid: u32) -> Option<ProcessRecord> {
        let sysinfo_pid = Pid::from_u32(pid);
        let system = Self::snapshot(ProcessesToUpdate::Some(&[sysinfo_pid]));
        system
            .process(sysinfo_pid)
            .map(|proc| Self::to_record(sysinfo_pid, proc))
    }

    fn send_graceful(&self, pid: u32) -> Result<(), NodeWardenError> {
        SignalSender::send(pid, Signal::graceful())
    }

    fn send_forceful(&self, pid: u32) -> Result<(), NodeWardenError> {
        SignalSender::send(pid, Signal::forceful())
    }

    fn wait_exit(&self, pid: u32, timeout: Duration) -> Result<bool, NodeWardenError> {
        let deadline = Instant::now() + timeout;

        loop {
            if Self::has_exited(pid) {
                return Ok(true);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}
