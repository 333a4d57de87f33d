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

//! tracewalk - EVM trace explorer
//!
//! Step through the struct-log trace of a transaction, opcode by opcode.

use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tracewalk_common::logging;

mod cmd;

/// Name used for log files and directories
const COMPONENT: &str = "tracewalk";

/// Command-line interface for tracewalk
#[derive(Debug, Parser)]
#[command(name = "tracewalk")]
#[command(about = "Trace walker - step through EVM execution traces opcode by opcode")]
#[command(version)]
pub struct Cli {
    /// Ethereum RPC endpoint exposing the debug namespace
    #[arg(long, env = "ETH_RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// Opcodes shown on each side of the current one (overrides the config file)
    #[arg(long)]
    pub window: Option<usize>,

    /// Config file to use instead of ~/.tracewalk.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print steps as plain text and read commands from stdin
    #[arg(long)]
    pub plain: bool,

    /// Run a fixed command list such as "next,next,quit" (implies --plain)
    #[arg(long)]
    pub script: Option<String>,

    /// Print the call tree and exit
    #[arg(long)]
    pub tree: bool,

    /// Where to get the trace from
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the full-screen terminal view will own the screen
    pub fn uses_terminal(&self) -> bool {
        !(self.plain || self.tree || self.script.is_some())
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay an existing transaction on the node and walk its trace
    Replay {
        /// Transaction hash to replay
        tx_hash: String,
    },
    /// Walk a trace saved as JSON
    File {
        /// Path of the trace file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let log_dir = if cli.uses_terminal() {
        Some(logging::init_file_only_logging(COMPONENT)?)
    } else {
        logging::init_logging(COMPONENT)?;
        None
    };

    let trace = cmd::acquire(&cli).await?;
    cmd::log_trace_header(&trace);

    if trace.struct_logs.is_empty() {
        eyre::bail!("Trace contains no steps, nothing to explore");
    }

    if cli.tree {
        cmd::print_tree(&trace.struct_logs);
        return Ok(());
    }

    let config = cmd::load_config(cli.config.as_deref(), cli.uses_terminal())?;
    let outcome = cmd::run_session(&cli, config, trace.struct_logs).await;
    if let Some(hint) = cmd::log_hint(log_dir.as_deref(), outcome.is_err()) {
        eprintln!("{hint}");
    }

    match outcome? {
        cmd::SessionOutcome::Finished(summary) => tracing::info!(
            "Session finished at step {} after {} renders",
            summary.last_rendered_index + 1,
            summary.renders
        ),
        cmd::SessionOutcome::Cancelled => tracing::info!("Session cancelled"),
    }

    Ok(())
}
