// Batch Assembler — Random partitioning plus per-batch decoy mixing
//
// Admitted real queries are consumed in order as contiguous, randomly
// sized slices. Each batch gets its own decoys drawn against a shared
// global chaff pool, then the batch contents are shuffled so position
// reveals nothing about which entries are real.

use crate::privacy::chaff;
use crate::privacy::query::{Batch, RealQuery, ScheduledQuery};
use crate::privacy::rand_util;
use crate::privacy::settings::ShieldSettings;
use rand::Rng;

/// Partition `admitted` into shuffled real+chaff batches.
///
/// `settings` must already be sanitized. `send_at_ms` is left at 0 for the
/// dispatch scheduler to stamp. The chaff pool is shared across batches:
/// each batch's draw is capped by what earlier batches left behind, so late
/// batches may legally carry zero decoys.
pub fn assemble_batches<R: Rng>(
    rng: &mut R,
    admitted: &[RealQuery],
    settings: &ShieldSettings,
    mut chaff_budget: usize,
) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut cursor = 0;

    while cursor < admitted.len() {
        let remaining = admitted.len() - cursor;
        let lo = settings.batch_min.min(remaining);
        let hi = settings.batch_max.min(remaining);
        let size = rand_util::uniform_usize(rng, lo, hi);

        let real_slice = &admitted[cursor..cursor + size];
        cursor += size;

        let chaff_requested = rand_util::uniform_usize(
            rng,
            settings.chaff_per_batch_min,
            settings.chaff_per_batch_max,
        );
        let decoys = chaff::generate_chaff(rng, real_slice, chaff_requested, chaff_budget);
        chaff_budget -= decoys.len();

        let mut queries: Vec<ScheduledQuery> = real_slice
            .iter()
            .cloned()
            .map(ScheduledQuery::from_real)
            .collect();
        queries.extend(decoys);
        rand_util::shuffle(rng, &mut queries);

        batches.push(Batch {
            queries,
            send_at_ms: 0,
        });
    }

    batches
}
