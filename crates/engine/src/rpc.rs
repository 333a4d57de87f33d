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

//! JSON-RPC client for fetching struct-log traces from a node

use std::time::Duration;

use alloy_primitives::TxHash;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::{
    acquire::{parse_trace, RawTrace},
    error::AcquisitionError,
};

/// Method used to replay a transaction with the default struct logger
pub const TRACE_METHOD: &str = "debug_traceTransaction";

/// Fetches traces from a node exposing the `debug` namespace
pub struct TraceFetcher {
    client: HttpClient,
    url: String,
}

impl TraceFetcher {
    /// Create a fetcher for the given endpoint
    pub fn new(url: &str) -> Result<Self, AcquisitionError> {
        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| AcquisitionError::Rpc {
                method: TRACE_METHOD.to_string(),
                url: url.to_string(),
                cause: e.to_string(),
            })?;

        debug!("Created trace fetcher for: {}", url);
        Ok(Self { client, url: url.to_string() })
    }

    /// Endpoint this fetcher talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replay `tx_hash` on the node and decode the resulting trace
    pub async fn fetch(&self, tx_hash: TxHash) -> Result<RawTrace, AcquisitionError> {
        info!("Fetching trace of {} from {}", tx_hash, self.url);

        let params = vec![json!(tx_hash.to_string()), json!({})];
        let value = match self.client.request::<Value, _>(TRACE_METHOD, params).await {
            Ok(value) => value,
            Err(e) => {
                error!("{} failed for {}: {}", TRACE_METHOD, tx_hash, e);
                return Err(AcquisitionError::Rpc {
                    method: TRACE_METHOD.to_string(),
                    url: self.url.clone(),
                    cause: e.to_string(),
                });
            }
        };

        let trace = parse_trace(value)?;
        debug!("Received {} steps for {}", trace.struct_logs.len(), tx_hash);
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_url() {
        let result = TraceFetcher::new("not a url");
        assert!(matches!(result, Err(AcquisitionError::Rpc { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_rpc_error() {
        // Port 9 (discard) is closed on test machines
        let fetcher = TraceFetcher::new("http://127.0.0.1:9").unwrap();
        assert_eq!(fetcher.url(), "http://127.0.0.1:9");

        let result = fetcher.fetch(TxHash::ZERO).await;
        match result {
            Err(AcquisitionError::Rpc { method, url, .. }) => {
                assert_eq!(method, TRACE_METHOD);
                assert_eq!(url, "http://127.0.0.1:9");
            }
            other => panic!("expected an RPC error, got {other:?}"),
        }
    }
}
