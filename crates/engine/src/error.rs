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

//! Error types for trace acquisition and interactive sessions.
//!
//! Structural oddities in a trace, cursor moves past either end, and missing
//! stack/memory/storage fields are deliberately *not* errors; they degrade to
//! a valid tree, a no-op move, and placeholder text respectively.

use std::path::PathBuf;

/// Failure to obtain a step sequence from an external source
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// The transaction hash is not a 32-byte hex value
    #[error("Invalid transaction hash '{hash}': {cause}")]
    InvalidTxHash {
        /// The hash as given by the operator
        hash: String,
        /// Why it could not be parsed
        cause: String,
    },

    /// The JSON-RPC endpoint could not be reached or rejected the request
    #[error("{method} against {url} failed: {cause}")]
    Rpc {
        /// RPC method that was invoked
        method: String,
        /// Endpoint URL
        url: String,
        /// Error reported by the client
        cause: String,
    },

    /// A trace file could not be read
    #[error("Failed to read trace file {}: {source}", path.display())]
    Io {
        /// Path of the trace file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The payload is not valid JSON or does not match the step record shape
    #[error("Failed to decode trace: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload is neither a trace object nor a list of steps
    #[error("Trace has no 'structLogs' array")]
    MissingStructLogs,
}

/// Failure while running an interactive session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// There is nothing to navigate
    #[error("Trace contains no steps")]
    EmptyTrace,

    /// Reading input or writing output failed
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),
}
