// EDB - Ethereum Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Command implementations

use std::{io, path::Path, thread};

use eyre::Result;
use tokio::sync::oneshot;
use tracewalk_common::StepRecord;
use tracewalk_engine::{
    load_trace_file, parse_tx_hash, RawTrace, ScriptedCommands, SessionSummary, TraceFetcher,
    TraceRenderer, TraceTree, FAREWELL_MESSAGE,
};
use tracewalk_tui::{api, Config};
use tracing::{info, warn};

use crate::{Cli, Commands};

/// How an interactive session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The session quit on its own
    Finished(SessionSummary),
    /// Ctrl+C arrived while a text session was waiting for input
    Cancelled,
}

/// Load the config file given on the command line, or the default one
///
/// An explicit file must load. Problems with the default file only cost the
/// operator their preferences. The default file is written out only when
/// `create_default` is set.
pub fn load_config(path: Option<&Path>, create_default: bool) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => {
            let loaded = if create_default { Config::load() } else { Config::load_or_default() };
            Ok(loaded.unwrap_or_else(|e| {
                warn!("Using default configuration: {}", e);
                Config::default()
            }))
        }
    }
}

/// Message pointing the operator at the log files after a failed session
pub fn log_hint(log_dir: Option<&Path>, failed: bool) -> Option<String> {
    match log_dir {
        Some(dir) if failed => Some(format!("Session failed, see the logs in {}", dir.display())),
        _ => None,
    }
}

/// Obtain the trace named by the subcommand
pub async fn acquire(cli: &Cli) -> Result<RawTrace> {
    let trace = match &cli.command {
        Commands::Replay { tx_hash } => {
            info!("Replaying transaction: {}", tx_hash);
            let tx_hash = parse_tx_hash(tx_hash)?;
            TraceFetcher::new(&cli.rpc_url)?.fetch(tx_hash).await?
        }
        Commands::File { path } => {
            info!("Loading trace file: {}", path.display());
            load_trace_file(path)?
        }
    };
    Ok(trace)
}

/// Log the transaction-level fields that accompany the steps
pub fn log_trace_header(trace: &RawTrace) {
    info!(
        gas = ?trace.gas,
        failed = ?trace.failed,
        return_value = ?trace.return_value,
        steps = trace.struct_logs.len(),
        "Trace acquired"
    );
    if trace.failed == Some(true) {
        warn!("Transaction reverted");
    }
}

/// Print the call tree outline
pub fn print_tree(steps: &[StepRecord]) {
    print!("{}", TraceTree::build(steps).outline());
}

/// Run the interactive session in the front end selected on the command line
///
/// Text sessions end with the farewell on Ctrl+C. The full-screen view reads
/// Ctrl+C as a key instead.
pub async fn run_session(
    cli: &Cli,
    config: Config,
    steps: Vec<StepRecord>,
) -> Result<SessionOutcome> {
    let renderer = TraceRenderer::new(cli.window.unwrap_or(config.view.window_radius));
    let script = cli.script.clone();
    let plain = cli.plain;
    let terminal = cli.uses_terminal();

    // Every front end blocks on its input. A plain thread is not joined when
    // the runtime shuts down, so a pending stdin read cannot hold up exit.
    let (tx, rx) = oneshot::channel();
    thread::Builder::new().name("session".to_string()).spawn(move || {
        let tree = TraceTree::build(&steps);
        let result = match script {
            Some(script) => {
                let mut commands = ScriptedCommands::parse(&script);
                api::run_plain(&tree, renderer, &mut commands, io::stdout())
            }
            None if plain => api::run_lines(&tree, renderer, io::stdin().lock(), io::stdout()),
            None => api::run_terminal(&tree, renderer, config.theme),
        };
        let _ = tx.send(result);
    })?;

    if terminal {
        return Ok(SessionOutcome::Finished(rx.await??));
    }

    tokio::select! {
        result = rx => Ok(SessionOutcome::Finished(result??)),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received Ctrl+C, ending session");
            println!("{FAREWELL_MESSAGE}");
            Ok(SessionOutcome::Cancelled)
        }
    }
}
