//! In-memory process table for unit tests

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use crate::error::NodeWardenError;
use crate::process_info::{ProcessRecord, ProcessTable};
use crate::signal::Signal;

/// Process table that records every signal and wait it is asked for
#[derive(Default)]
pub(crate) struct FakeProcessTable {
    processes: RefCell<Vec<ProcessRecord>>,
    signals: RefCell<Vec<(u32, Signal)>>,
    waits: RefCell<Vec<(u32, Duration)>>,
    ignore_sigterm: HashSet<u32>,
    denied: HashSet<u32>,
    broken_wait: HashSet<u32>,
}

impl FakeProcessTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_process(self, pid: u32, name: &str, cmdline: &[&str]) -> Self {
        self.processes.borrow_mut().push(ProcessRecord {
            pid,
            parent_pid: Some(1),
            name: name.to_string(),
            cmdline: cmdline.iter().map(|s| s.to_string()).collect(),
            status: "Sleeping".to_string(),
        });
        self
    }

    pub(crate) fn ignoring_sigterm(mut self, pid: u32) -> Self {
        self.ignore_sigterm.insert(pid);
        self
    }

    pub(crate) fn denying(mut self, pid: u32) -> Self {
        self.denied.insert(pid);
        self
    }

    pub(crate) fn failing_wait(mut self, pid: u32) -> Self {
        self.broken_wait.insert(pid);
        self
    }

    pub(crate) fn signals(&self) -> Vec<(u32, Signal)> {
        self.signals.borrow().clone()
    }

    pub(crate) fn waits(&self) -> Vec<(u32, Duration)> {
        self.waits.borrow().clone()
    }

    pub(crate) fn is_alive(&self, pid: u32) -> bool {
        self.processes.borrow().iter().any(|p| p.pid == pid)
    }

    fn deliver(&self, pid: u32, signal: Signal) -> Result<(), NodeWardenError> {
        if !self.is_alive(pid) {
            return Err(NodeWardenError::ProcessNotFound(pid));
        }
        if self.denied.contains(&pid) {
            return Err(NodeWardenError::PermissionDenied(pid));
        }

        self.signals.borrow_mut().push((pid, signal));
        let dies = signal == Signal::SIGKILL || !self.ignore_sigterm.contains(&pid);
        if dies {
            self.processes.borrow_mut().retain(|p| p.pid != pid);
        }
        Ok(())
    }
}

impl ProcessTable for FakeProcessTable {
    fn enumerate(&self) -> Vec<ProcessRecord> {
        self.processes.borrow().clone()
    }

    fn get(&self, pid: u32) -> Option<ProcessRecord> {
        self.processes
            .borrow()
            .iter()
            .find(|p| p.pid == pid)
            .cloned()
    }

    fn send_graceful(&self, pid: u32) -> Result<(), NodeWardenError> {
        self.deliver(pid, Signal::graceful())
    }

    fn send_forceful(&self, pid: u32) -> Result<(), NodeWardenError> {
        self.deliver(pid, Signal::forceful())
    }

    fn wait_exit(&self, pid: u32, timeout: Duration) -> Result<bool, NodeWardenError> {
        self.waits.borrow_mut().push((pid, timeout));
        if self.broken_wait.contains(&pid) {
            return Err(NodeWardenError::Unexpected("wait failed".to_string()));
        }
        Ok(!self.is_alive(pid))
    }
}
