// Plan Executor — Drives a shield plan against a provider transport
//
// The executor owns the only clock-facing and network-facing part of the
// shield's lifecycle: wait for each batch's send time, dispatch its
// queries, and hand back real results only. Decoy responses die here;
// callers never observe `is_chaff` or chaff response data.

use crate::privacy::query::{Plan, QueryKind};
use crate::privacy::settings::wall_clock_ms;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Request shape on the wire. Owned by the endpoint's protocol, not the
/// shield: one lookup per request, no id, no chaff marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub kind: QueryKind,
    pub target: String,
}

/// Response shape on the wire; which payload field is set depends on the
/// request kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utxos: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_hex: Option<String>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("provider rejected request: {0}")]
    Rejected(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The seam a concrete provider client implements. One network request per
/// scheduled query; the executor decides when and with what.
#[async_trait]
pub trait ShieldTransport: Send + Sync {
    async fn send(&self, endpoint: &str, request: WireRequest)
        -> Result<WireResponse, TransportError>;
}

/// Outcome of one real lookup. Transport failures degrade to per-query
/// outcomes; they never abort the rest of the plan.
#[derive(Debug)]
pub enum LookupOutcome {
    Ok(WireResponse),
    Failed(TransportError),
}

impl LookupOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, LookupOutcome::Ok(_))
    }
}

/// A real query's result, correlated back by the shield-assigned id.
#[derive(Debug)]
pub struct LookupResult {
    pub query_id: String,
    pub kind: QueryKind,
    pub target: String,
    pub meta: Option<serde_json::Value>,
    pub outcome: LookupOutcome,
}

/// What an execution actually sent and recovered.
///
/// `lookups_sent` counts real and chaff together — it is the number the
/// caller must feed back into its rolling usage window.
#[derive(Debug)]
pub struct ExecutionReport {
    /// Results for real queries only, in dispatch order
    pub results: Vec<LookupResult>,
    /// Real + chaff requests issued
    pub lookups_sent: u32,
    pub batches_sent: usize,
}

/// Executes a `Plan` batch by batch against a transport.
///
/// Dropping the future returned by [`execute`](PlanExecutor::execute)
/// cancels execution: batches not yet dispatched are simply discarded, and
/// no state persists. Requests within a batch are issued concurrently.
pub struct PlanExecutor<T: ShieldTransport> {
    transport: T,
}

impl<T: ShieldTransport> PlanExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Access the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the plan to completion, sleeping until each batch's send time.
    pub async fn execute(&self, plan: Plan) -> ExecutionReport {
        let mut results = Vec::with_capacity(plan.total_real);
        let mut lookups_sent: u32 = 0;
        let batches_sent = plan.batches.len();

        for batch in plan.batches {
            let now = wall_clock_ms();
            if batch.send_at_ms > now {
                tokio::time::sleep(Duration::from_millis(batch.send_at_ms - now)).await;
            }

            debug!(
                queries = batch.queries.len(),
                send_at_ms = batch.send_at_ms,
                endpoint = %plan.endpoint,
                "dispatching batch"
            );

            let outcomes = join_all(batch.queries.iter().map(|query| {
                let request = WireRequest {
                    kind: query.kind,
                    target: query.target.clone(),
                };
                self.transport.send(&plan.endpoint, request)
            }))
            .await;

            lookups_sent += batch.queries.len() as u32;

            for (query, outcome) in batch.queries.into_iter().zip(outcomes) {
                // Decoy responses are discarded at this boundary; whatever
                // the provider answered for them is never surfaced.
                if query.is_chaff {
                    continue;
                }

                let outcome = match outcome {
                    Ok(response) => LookupOutcome::Ok(response),
                    Err(err) => {
                        warn!(target_query = %query.target, error = %err, "lookup failed");
                        LookupOutcome::Failed(err)
                    }
                };
                results.push(LookupResult {
                    query_id: query.id,
                    kind: query.kind,
                    target: query.target,
                    meta: query.meta,
                    outcome,
                });
            }
        }

        ExecutionReport {
            results,
            lookups_sent,
            batches_sent,
        }
    }
}
