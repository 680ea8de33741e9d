// Chaff Generator — Decoy queries shaped like real traffic
//
// Decoys mirror the kind distribution of the real queries they travel with
// but never reuse real targets or metadata. An observer sees plausible
// lookups; the provider answers them like any other.

use crate::privacy::query::{QueryKind, RealQuery, ScheduledQuery};
use crate::privacy::rand_util;
use rand::Rng;

/// Generate up to `requested` decoys, hard-capped by `budget`.
///
/// Kinds cycle through the prototype set (`prototypes[i % len]`) so the
/// decoy mix approximates the real mix; an empty prototype set falls back
/// to `tx-raw`. For `block-header` decoys, a numeric height from the
/// prototypes anchors the synthetic height so decoys are not separable
/// from real lookups by magnitude.
pub fn generate_chaff<R: Rng>(
    rng: &mut R,
    prototypes: &[RealQuery],
    requested: usize,
    budget: usize,
) -> Vec<ScheduledQuery> {
    let count = requested.min(budget);
    if count == 0 {
        return Vec::new();
    }

    let anchors: Vec<u64> = prototypes
        .iter()
        .filter(|p| p.kind == QueryKind::BlockHeader)
        .filter_map(|p| rand_util::parse_height(&p.target))
        .collect();

    (0..count)
        .map(|i| {
            let kind = if prototypes.is_empty() {
                QueryKind::TxRaw
            } else {
                prototypes[i % prototypes.len()].kind
            };
            let anchor = match kind {
                QueryKind::BlockHeader if !anchors.is_empty() => {
                    Some(anchors[rng.gen_range(0..anchors.len())])
                }
                _ => None,
            };
            let target = rand_util::random_target(rng, kind, anchor);
            ScheduledQuery::decoy(kind, target)
        })
        .collect()
}
