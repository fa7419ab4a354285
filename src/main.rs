//! node-warden: list and safely terminate Node.js processes
//!
//! Interactive front end over the policy engine. Ctrl-C and end of input both
//! end the session with "Interrupted by user." and exit status 1.

use std::io;
use std::process::ExitCode;

use node_warden::cli::{CliArgs, ExecutionMode};
use node_warden::error::{NodeWardenError, NodeWardenExitCode};
use node_warden::policy::PolicyEngine;
use node_warden::privilege;
use node_warden::process_info::SystemProcessTable;
use node_warden::session::{collect_listing, write_listing, Session};
use node_warden::signal;

fn main() -> ExitCode {
    match run() {
        Ok(()) => NodeWardenExitCode::Success.into(),
        Err(NodeWardenError::Interrupted) => {
            println!();
            println!("Interrupted by user.");
            NodeWardenExitCode::Interrupted.into()
        }
        Err(e) => {
            eprintln!("node-warden: {}", e);
            e.exit_code().into()
        }
    }
}

/// Main execution logic
fn run() -> Result<(), NodeWardenError> {
    let args = CliArgs::parse_args();
    let mode = args.validate()?;
    signal::install_interrupt_handler()?;

    if let Some(hint) = privilege::advisory() {
        eprintln!("{}", hint);
    }

    let engine = PolicyEngine::new(args.config(), SystemProcessTable::new());

    match mode {
        ExecutionMode::ListOnce => {
            let processes = collect_listing(&engine);
            write_listing(&mut io::stdout().lock(), engine.config(), &processes)
        }
        ExecutionMode::Interactive => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Session::new(&engine, stdin.lock(), stdout.lock()).run()
        }
    }
}
