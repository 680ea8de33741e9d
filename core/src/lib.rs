// Sentinel Core — Wallet-Monitoring Spine
//
// "Can a provider watching our traffic tell which lookups we actually
//  needed, and when we needed them?"
//
// If the answer is yes, the shield isn't doing its job.

pub mod executor;
pub mod privacy;
pub mod usage;

pub use executor::{
    ExecutionReport, LookupOutcome, LookupResult, PlanExecutor, ShieldTransport, TransportError,
    WireRequest, WireResponse,
};
pub use privacy::{
    plan, plan_with_rng, Batch, Plan, QueryKind, RealQuery, ScheduledQuery, ShieldContext,
    ShieldSettings,
};
pub use usage::UsageWindow;

/// Initialize tracing output (idempotent).
///
/// Honors `RUST_LOG`; defaults to `info` when unset. Safe to call from
/// multiple entry points — later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_public_surface_composes() {
        // Planning through the re-exported names only
        let queries = vec![RealQuery::new(QueryKind::TxRaw, "ab".repeat(32))];
        let ctx = ShieldContext::new("https://indexer.example").at(1_700_000_000_000);
        let plan = plan(&queries, &ShieldSettings::default(), &ctx);
        assert_eq!(plan.total_real + plan.dropped_real, 1);
    }
}
