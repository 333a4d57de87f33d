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

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Memory;

/// Storage slots touched by a step, in the order the tracer reported them
pub type Storage = IndexMap<String, String>;

/// One recorded execution state, as found in a `structLogs` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Program counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<u64>,
    /// Operation name, e.g. `PUSH1`
    pub op: String,
    /// Remaining gas before the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas charged by the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_cost: Option<u64>,
    /// Call depth, root-level frames are usually at depth 1
    pub depth: u64,
    /// Error reported by the tracer for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution stack, the last element is the top of the stack
    #[serde(
        default,
        deserialize_with = "lenient_stack",
        skip_serializing_if = "Option::is_none"
    )]
    pub stack: Option<Vec<String>>,
    /// Memory snapshot
    #[serde(default, skip_serializing_if = "Memory::is_absent")]
    pub memory: Memory,
    /// Storage slots touched so far in the current frame
    #[serde(
        default,
        deserialize_with = "lenient_storage",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage: Option<Storage>,
}

/// Text of a displayed value: strings as they are, anything else as JSON
fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_stack<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let stack = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(stack.map(|items| items.into_iter().map(display_value).collect()))
}

fn lenient_storage<'de, D>(deserializer: D) -> Result<Option<Storage>, D::Error>
where
    D: Deserializer<'de>,
{
    let storage = Option::<IndexMap<String, Value>>::deserialize(deserializer)?;
    Ok(storage.map(|slots| slots.into_iter().map(|(k, v)| (k, display_value(v))).collect()))
}

impl StepRecord {
    /// Create a bare step with only an operation and a depth
    pub fn new(op: impl Into<String>, depth: u64) -> Self {
        Self { op: op.into(), depth, ..Default::default() }
    }
}
