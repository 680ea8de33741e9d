// Dispatch Scheduler — Strictly increasing, irregularly spaced send times
//
// A fixed-interval schedule is itself a correlation signal, so every gap
// is drawn independently. The first batch waits only the intra-batch
// jitter; every later batch adds an inter-batch gap on top, accumulated
// onto a running clock.

use crate::privacy::query::Batch;
use crate::privacy::rand_util;
use crate::privacy::settings::ShieldSettings;
use rand::Rng;

/// Stamp `send_at_ms` on each batch, strictly increasing from `now_ms`.
///
/// `settings` must already be sanitized. Gaps between consecutive batches
/// are floored at 1 ms so monotonicity holds even under all-zero jitter
/// policies.
pub fn schedule_batches<R: Rng>(
    rng: &mut R,
    batches: &mut [Batch],
    settings: &ShieldSettings,
    now_ms: u64,
) {
    let mut clock = now_ms;

    for (i, batch) in batches.iter_mut().enumerate() {
        let intra = rand_util::uniform_u64(
            rng,
            settings.intra_batch_jitter_min_ms,
            settings.intra_batch_jitter_max_ms,
        );
        let delay = if i == 0 {
            intra
        } else {
            let inter = rand_util::uniform_u64(
                rng,
                settings.inter_batch_jitter_min_ms,
                settings.inter_batch_jitter_max_ms,
            );
            (inter + intra).max(1)
        };

        clock += delay;
        batch.send_at_ms = clock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5c4ed)
    }

    fn empty_batches(n: usize) -> Vec<Batch> {
        (0..n)
            .map(|_| Batch {
                queries: Vec::new(),
                send_at_ms: 0,
            })
            .collect()
    }

    fn jitter(intra: (u64, u64), inter: (u64, u64)) -> ShieldSettings {
        ShieldSettings {
            intra_batch_jitter_min_ms: intra.0,
            intra_batch_jitter_max_ms: intra.1,
            inter_batch_jitter_min_ms: inter.0,
            inter_batch_jitter_max_ms: inter.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_send_times_strictly_increasing() {
        let mut rng = rng();
        let mut batches = empty_batches(12);
        schedule_batches(&mut rng, &mut batches, &jitter((0, 100), (50, 500)), 1_000_000);

        for pair in batches.windows(2) {
            assert!(pair[0].send_at_ms < pair[1].send_at_ms);
        }
    }

    #[test]
    fn test_first_batch_skips_inter_batch_gap() {
        let mut rng = rng();
        let mut batches = empty_batches(1);
        // intra fixed at 40, inter would add at least 10_000
        schedule_batches(&mut rng, &mut batches, &jitter((40, 40), (10_000, 20_000)), 500);
        assert_eq!(batches[0].send_at_ms, 540);
    }

    #[test]
    fn test_later_batches_include_both_gaps() {
        let mut rng = rng();
        let mut batches = empty_batches(4);
        schedule_batches(&mut rng, &mut batches, &jitter((10, 20), (100, 200)), 0);

        for pair in batches.windows(2) {
            let gap = pair[1].send_at_ms - pair[0].send_at_ms;
            assert!((110..=220).contains(&gap), "gap {} outside inter+intra bounds", gap);
        }
    }

    #[test]
    fn test_zero_jitter_still_strictly_monotonic() {
        let mut rng = rng();
        let mut batches = empty_batches(8);
        schedule_batches(&mut rng, &mut batches, &jitter((0, 0), (0, 0)), 7_777);

        assert_eq!(batches[0].send_at_ms, 7_777);
        for pair in batches.windows(2) {
            assert!(pair[0].send_at_ms < pair[1].send_at_ms);
        }
    }

    #[test]
    fn test_gaps_vary() {
        let mut rng = rng();
        let mut batches = empty_batches(20);
        schedule_batches(&mut rng, &mut batches, &jitter((0, 1_000), (500, 5_000)), 0);

        let gaps: Vec<u64> = batches
            .windows(2)
            .map(|p| p[1].send_at_ms - p[0].send_at_ms)
            .collect();
        let first = gaps[0];
        assert!(
            gaps.iter().any(|&g| g != first),
            "independent jitter draws should not produce a fixed interval"
        );
    }

    #[test]
    fn test_clock_starts_at_context_now() {
        let mut rng = rng();
        let mut batches = empty_batches(3);
        let now = 1_699_999_999_000;
        schedule_batches(&mut rng, &mut batches, &jitter((5, 50), (10, 100)), now);

        assert!(batches[0].send_at_ms >= now + 5);
        assert!(batches[0].send_at_ms <= now + 50);
    }

    #[test]
    fn test_no_batches_is_a_noop() {
        let mut rng = rng();
        let mut batches = empty_batches(0);
        schedule_batches(&mut rng, &mut batches, &jitter((0, 10), (0, 10)), 123);
        assert!(batches.is_empty());
    }
}
