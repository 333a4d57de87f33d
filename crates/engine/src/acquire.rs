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

//! Trace decoding
//!
//! Traces arrive either as the result of `debug_traceTransaction` (an object
//! with a `structLogs` array) or as a saved file holding that object or just
//! the bare array of steps.

use std::{fs, path::Path};

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracewalk_common::StepRecord;
use tracing::{debug, info};

use crate::error::AcquisitionError;

/// A decoded execution trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrace {
    /// Gas used by the transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Whether the transaction reverted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    /// Hex encoded return data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
    /// The recorded steps, in execution order
    pub struct_logs: Vec<StepRecord>,
}

impl RawTrace {
    /// Wrap a bare step list
    pub fn from_steps(struct_logs: Vec<StepRecord>) -> Self {
        Self { struct_logs, ..Default::default() }
    }
}

/// Decode a trace object or a bare list of steps
pub fn parse_trace(value: Value) -> Result<RawTrace, AcquisitionError> {
    match value {
        Value::Array(_) => Ok(RawTrace::from_steps(serde_json::from_value(value)?)),
        Value::Object(ref map) if map.contains_key("structLogs") => {
            Ok(serde_json::from_value(value)?)
        }
        _ => Err(AcquisitionError::MissingStructLogs),
    }
}

/// Load a trace saved as JSON
pub fn load_trace_file(path: &Path) -> Result<RawTrace, AcquisitionError> {
    debug!("Loading trace from {}", path.display());

    let content = fs::read_to_string(path)
        .map_err(|source| AcquisitionError::Io { path: path.to_path_buf(), source })?;
    let trace = parse_trace(serde_json::from_str(&content)?)?;

    info!("Loaded {} steps from {}", trace.struct_logs.len(), path.display());
    Ok(trace)
}

/// Validate a transaction hash before any request is made
pub fn parse_tx_hash(hash: &str) -> Result<TxHash, AcquisitionError> {
    hash.trim().parse::<TxHash>().map_err(|e| AcquisitionError::InvalidTxHash {
        hash: hash.to_string(),
        cause: e.to_string(),
    })
}
