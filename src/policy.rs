//! Policy engine for node-warden
//!
//! Selects target processes by name prefix, classifies them, and re-verifies
//! eligibility against a fresh lookup before anything is signaled.

use crate::config::Config;
use crate::killer::{
    BatchKillResult, Ineligibility, KillResult, ProcessKiller, TerminationOutcome,
};
use crate::process_info::{current_pid, ProcessRecord, ProcessTable, SystemProcessTable};

/// Result of a kill permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillPermission {
    /// Kill is allowed
    Allowed,
    /// Name does not match the target prefix
    DeniedWrongName(String),
    /// Command line matched this protected keyword
    DeniedProtected(String),
    /// Would kill this tool or its parent
    DeniedSuicidePrevention,
}

impl KillPermission {
    /// Reason for a denial, None if allowed
    pub fn ineligibility(&self) -> Option<Ineligibility> {
        match self {
            KillPermission::Allowed => None,
            KillPermission::DeniedWrongName(name) => Some(Ineligibility::WrongName(name.clone())),
            KillPermission::DeniedProtected(keyword) => {
                Some(Ineligibility::Protected(keyword.clone()))
            }
            KillPermission::DeniedSuicidePrevention => Some(Ineligibility::SelfOrParent),
        }
    }
}

/// Policy engine that orchestrates selection and termination
pub struct PolicyEngine<P: ProcessTable> {
    config: Config,
    table: P,
    session_pids: Vec<u32>,
}

impl PolicyEngine<SystemProcessTable> {
    /// Engine over the live process table with the built-in configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::with_defaults(), SystemProcessTable::new())
    }
}

impl<P: ProcessTable> PolicyEngine<P> {
    /// Create a new PolicyEngine over `table`
    pub fn new(config: Config, table: P) -> Self {
        let own_pid = current_pid();
        let mut session_pids = vec![own_pid];
        if let Some(parent) = table.get(own_pid).and_then(|p| p.parent_pid) {
            session_pids.push(parent);
        }

        Self {
            config,
            table,
            session_pids,
        }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the process table
    pub fn table(&self) -> &P {
        &self.table
    }

    /// Keyword that protects this process, if any
    pub fn protected_by(&self, process: &ProcessRecord) -> Option<&str> {
        self.config.classifier().matched_keyword(&process.cmdline)
    }

    /// Check if a process can be killed
    pub fn can_kill(&self, process: &ProcessRecord) -> KillPermission {
        if !self.config.is_target_name(&process.name) {
            return KillPermission::DeniedWrongName(process.name.clone());
        }

        if let Some(keyword) = self.protected_by(process) {
            return KillPermission::DeniedProtected(keyword.to_string());
        }

        if self.session_pids.contains(&process.pid) {
            return KillPermission::DeniedSuicidePrevention;
        }

        KillPermission::Allowed
    }

    /// All live processes whose name starts with the target prefix
    pub fn list_targets(&self) -> Vec<ProcessRecord> {
        self.table
            .enumerate()
            .into_iter()
            .filter(|p| self.config.is_target_name(&p.name))
            .collect()
    }

    /// Terminate a process by PID after re-checking it against a fresh lookup
    pub fn terminate(&self, pid: u32) -> TerminationOutcome {
        let Some(process) = self.table.get(pid) else {
            return TerminationOutcome::NotFound;
        };

        if let Some(reason) = self.can_kill(&process).ineligibility() {
            return TerminationOutcome::NotEligible(reason);
        }

        ProcessKiller::new(&self.table, self.config.exit_timeout()).kill(pid)
    }

    /// Terminate every target that is not protected
    ///
    /// Failures on one process never stop the run.
    pub fn terminate_all_eligible(&self) -> BatchKillResult {
        let mut batch_result = BatchKillResult::new();

        for process in self.list_targets() {
            let outcome = match self.can_kill(&process) {
                KillPermission::Allowed => self.terminate(process.pid),
                denied => match denied.ineligibility() {
                    Some(reason) => TerminationOutcome::NotEligible(reason),
                    None => continue,
                },
            };

            batch_result.add(KillResult {
                pid: process.pid,
                name: process.name,
                outcome,
            });
        }

        batch_result
    }
}
