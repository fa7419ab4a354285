//! Interactive menu for node-warden
//!
//! Each menu action returns an `ActionOutcome`; the loop renders it and goes
//! back to the menu. Only Exit and an operator abort leave the loop.

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::NodeWardenError;
use crate::killer::{BatchKillResult, BatchSummary, Ineligibility, TerminationOutcome};
use crate::policy::PolicyEngine;
use crate::process_info::{ProcessRecord, ProcessTable};

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Show all target processes
    List,
    /// Terminate one process
    KillByPid,
    /// Terminate every non-protected target
    KillAll,
    /// Leave the session
    Exit,
}

impl MenuChoice {
    /// Parse a menu selection ("1" to "4")
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::List),
            "2" => Some(MenuChoice::KillByPid),
            "3" => Some(MenuChoice::KillAll),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Parse operator input into a PID usable with kill(2)
pub fn parse_pid(input: &str) -> Result<u32, NodeWardenError> {
    let input = input.trim();
    let value: i64 = input
        .parse()
        .map_err(|_| NodeWardenError::InvalidInput(format!("'{}' is not a number", input)))?;

    if value <= 0 || value > i64::from(i32::MAX) {
        return Err(NodeWardenError::InvalidInput(format!(
            "{} is not a positive PID",
            value
        )));
    }

    Ok(value as u32)
}

/// A target process as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedProcess {
    /// Snapshot of the process
    pub record: ProcessRecord,
    /// Whether the command line is protected
    pub protected: bool,
}

/// What a menu action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Target listing
    Listed(Vec<ListedProcess>),
    /// Single termination attempt
    Killed {
        /// Requested PID
        pid: u32,
        /// Result of the attempt
        outcome: TerminationOutcome,
    },
    /// Bulk termination
    KilledAll(BatchKillResult),
    /// Operator declined the confirmation
    Cancelled,
    /// Unrecognized menu selection
    InvalidChoice(String),
    /// Leave the session
    Exit,
}

/// Snapshot of the targets with their protection flag
pub fn collect_listing<P: ProcessTable>(engine: &PolicyEngine<P>) -> Vec<ListedProcess> {
    engine
        .list_targets()
        .into_iter()
        .map(|record| {
            let protected = engine.config().classifier().is_protected(&record.cmdline);
            ListedProcess { record, protected }
        })
        .collect()
}

/// Print the target listing
pub fn write_listing<W: Write>(
    out: &mut W,
    config: &Config,
    processes: &[ListedProcess],
) -> Result<(), NodeWardenError> {
    writeln!(out)?;
    if processes.is_empty() {
        writeln!(out, "No running {} processes found.", config.target_prefix())?;
        return Ok(());
    }

    writeln!(
        out,
        "Running {} processes ({}):",
        config.target_prefix(),
        processes.len()
    )?;
    writeln!(out, "{:>8}  {:<10}  COMMAND", "PID", "STATUS")?;
    writeln!(out, "{}", "-".repeat(70))?;

    for p in processes {
        let cmd = if p.record.cmdline.is_empty() {
            "<unknown>".to_string()
        } else {
            p.record.cmdline_text()
        };
        let marker = if p.protected { "  (protected)" } else { "" };
        writeln!(
            out,
            "{:>8}  {:<10}  {}{}",
            p.record.pid, p.record.status, cmd, marker
        )?;
    }

    if processes.iter().any(|p| p.protected) {
        writeln!(
            out,
            "Protected keywords: {}",
            config.classifier().keywords().join(", ")
        )?;
    }
    Ok(())
}

/// Human-readable line for a single termination outcome
pub fn describe_outcome(pid: u32, outcome: &TerminationOutcome, config: &Config) -> String {
    match outcome {
        TerminationOutcome::Terminated => format!("Terminated process PID {}", pid),
        TerminationOutcome::TimedOutThenKilled => format!(
            "Process {} did not exit within {}s, sent SIGKILL",
            pid,
            config.exit_timeout().as_secs()
        ),
        TerminationOutcome::NotFound => format!("No process with PID {}", pid),
        TerminationOutcome::AccessDenied => {
            format!("Permission denied: cannot terminate PID {}", pid)
        }
        TerminationOutcome::NotEligible(Ineligibility::WrongName(name)) => format!(
            "PID {} is not a {} process ({})",
            pid,
            config.target_prefix(),
            name
        ),
        TerminationOutcome::NotEligible(Ineligibility::Protected(keyword)) => format!(
            "Warning: PID {} is a protected system process (matches \"{}\"), refusing to terminate",
            pid, keyword
        ),
        TerminationOutcome::NotEligible(Ineligibility::SelfOrParent) => format!(
            "PID {} belongs to this session, refusing to terminate",
            pid
        ),
        TerminationOutcome::Failed(reason) => {
            format!("Failed to terminate PID {}: {}", pid, reason)
        }
    }
}

/// Print per-process lines and the summary of a bulk run
pub fn write_batch<W: Write>(
    out: &mut W,
    config: &Config,
    batch: &BatchKillResult,
) -> Result<(), NodeWardenError> {
    for r in &batch.results {
        let line = match &r.outcome {
            TerminationOutcome::NotEligible(Ineligibility::Protected(_)) => {
                format!("Skipping protected process PID {}", r.pid)
            }
            TerminationOutcome::NotEligible(Ineligibility::SelfOrParent) => continue,
            outcome => describe_outcome(r.pid, outcome, config),
        };
        writeln!(out, "{}", line)?;
    }

    let prefix = config.target_prefix();
    match batch.summary() {
        BatchSummary::NothingFound => {
            writeln!(out, "No {} processes to terminate.", prefix)?;
        }
        BatchSummary::OnlyProtected => writeln!(
            out,
            "Only protected {} processes found; all were kept.",
            prefix
        )?,
        BatchSummary::Killed => writeln!(
            out,
            "Terminated {} process(es), skipped {} protected.",
            batch.killed_count, batch.skipped_protected_count
        )?,
    }
    Ok(())
}

/// Interactive session over any input/output pair
pub struct Session<'a, P: ProcessTable, R: BufRead, W: Write> {
    engine: &'a PolicyEngine<P>,
    input: R,
    output: W,
}

impl<'a, P: ProcessTable, R: BufRead, W: Write> Session<'a, P, R, W> {
    /// Create a new session
    pub fn new(engine: &'a PolicyEngine<P>, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
        }
    }

    /// Run the menu loop until Exit (Ok) or end of input (Interrupted)
    pub fn run(&mut self) -> Result<(), NodeWardenError> {
        loop {
            self.print_menu()?;
            let selection = self.prompt("\nSelect an option (1-4): ")?;

            match self.dispatch(&selection)? {
                ActionOutcome::Exit => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                outcome => self.render(&outcome)?,
            }
        }
    }

    /// Run one menu action
    pub fn dispatch(&mut self, selection: &str) -> Result<ActionOutcome, NodeWardenError> {
        let Some(choice) = MenuChoice::parse(selection) else {
            return Ok(ActionOutcome::InvalidChoice(selection.trim().to_string()));
        };

        match choice {
            MenuChoice::List => Ok(ActionOutcome::Listed(collect_listing(self.engine))),
            MenuChoice::KillByPid => {
                let pid = self.read_pid()?;
                Ok(ActionOutcome::Killed {
                    pid,
                    outcome: self.engine.terminate(pid),
                })
            }
            MenuChoice::KillAll => {
                let question = format!(
                    "Terminate all non-protected {} processes? (y/n): ",
                    self.engine.config().target_prefix()
                );
                let answer = self.prompt(&question)?;
                if answer.trim().eq_ignore_ascii_case("y") {
                    Ok(ActionOutcome::KilledAll(self.engine.terminate_all_eligible()))
                } else {
                    Ok(ActionOutcome::Cancelled)
                }
            }
            MenuChoice::Exit => Ok(ActionOutcome::Exit),
        }
    }

    fn print_menu(&mut self) -> Result<(), NodeWardenError> {
        let prefix = self.engine.config().target_prefix();
        writeln!(self.output)?;
        writeln!(self.output, "Choose an action:")?;
        writeln!(self.output, "1. List {} processes", prefix)?;
        writeln!(self.output, "2. Terminate a {} process by PID", prefix)?;
        writeln!(self.output, "3. Terminate all non-protected {} processes", prefix)?;
        writeln!(self.output, "4. Exit")?;
        Ok(())
    }

    /// Print `text` and read one line; end of input is an operator abort
    fn prompt(&mut self, text: &str) -> Result<String, NodeWardenError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(NodeWardenError::Interrupted);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the operator gives a usable PID
    fn read_pid(&mut self) -> Result<u32, NodeWardenError> {
        loop {
            let text = self.prompt("Enter the PID to terminate: ")?;
            match parse_pid(&text) {
                Ok(pid) => return Ok(pid),
                Err(e) => {
                    writeln!(self.output, "{}. Please enter a valid positive integer PID.", e)?
                }
            }
        }
    }

    fn render(&mut self, outcome: &ActionOutcome) -> Result<(), NodeWardenError> {
        let config = self.engine.config();
        match outcome {
            ActionOutcome::Listed(processes) => write_listing(&mut self.output, config, processes),
            ActionOutcome::Killed { pid, outcome } => {
                writeln!(self.output, "{}", describe_outcome(*pid, outcome, config))?;
                Ok(())
            }
            ActionOutcome::KilledAll(batch) => write_batch(&mut self.output, config, batch),
            ActionOutcome::Cancelled => {
                writeln!(self.output, "Cancelled.")?;
                Ok(())
            }
            ActionOutcome::InvalidChoice(text) => {
                writeln!(self.output, "Invalid option '{}', please choose 1-4.", text)?;
                Ok(())
            }
            ActionOutcome::Exit => Ok(()),
        }
    }
}
