// Privacy Shield — Planning entry point
//
// Turns the wallet's real lookups into a decoy-padded, time-jittered
// dispatch plan. Planning is pure and total: no I/O, no shared state, no
// failure mode beyond the empty plan.

use crate::privacy::batch::assemble_batches;
use crate::privacy::capacity::admit;
use crate::privacy::query::{Plan, RealQuery};
use crate::privacy::schedule::schedule_batches;
use crate::privacy::settings::{ShieldContext, ShieldSettings};
use rand::Rng;
use tracing::{debug, warn};

/// Plan with the ambient thread RNG (production path).
pub fn plan(real: &[RealQuery], settings: &ShieldSettings, context: &ShieldContext) -> Plan {
    plan_with_rng(&mut rand::thread_rng(), real, settings, context)
}

/// Plan with an injected RNG, deterministic under a seeded generator.
///
/// Pipeline: sanitize settings → admission gate → batch assembly (with
/// chaff drawn from the shared budget) → dispatch scheduling → totals.
/// Zero remaining capacity or zero real queries short-circuits to an empty
/// plan that drops everything and generates no chaff — there is nothing to
/// hide.
pub fn plan_with_rng<R: Rng>(
    rng: &mut R,
    real: &[RealQuery],
    settings: &ShieldSettings,
    context: &ShieldContext,
) -> Plan {
    let (settings, repaired) = settings.sanitize();
    if repaired {
        warn!("shield settings contained degenerate bounds; repaired in place");
    }

    let admission = admit(
        real.len(),
        settings.max_lookups_per_hour,
        context.lookups_used_last_hour,
    );

    if admission.is_empty() {
        debug!(
            dropped = admission.dropped,
            endpoint = %context.endpoint,
            "no capacity or no queries; returning empty plan"
        );
        return Plan::empty(context.endpoint.clone(), admission.dropped);
    }

    let admitted = &real[..admission.admitted];
    let mut batches = assemble_batches(rng, admitted, &settings, admission.chaff_budget);
    schedule_batches(rng, &mut batches, &settings, context.resolved_now_ms());

    let total_chaff = batches.iter().map(|b| b.chaff_count()).sum();
    let plan = Plan {
        endpoint: context.endpoint.clone(),
        batches,
        total_real: admission.admitted,
        total_chaff,
        dropped_real: admission.dropped,
        dropped_chaff: 0,
    };

    debug!(
        batches = plan.batches.len(),
        total_real = plan.total_real,
        total_chaff = plan.total_chaff,
        dropped_real = plan.dropped_real,
        endpoint = %plan.endpoint,
        "shield plan assembled"
    );
    plan
}
