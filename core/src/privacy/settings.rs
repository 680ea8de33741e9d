// Shield Settings — Tunable policy for batching, chaff, jitter, admission
//
// Settings are sanitized rather than rejected: a degenerate policy must
// never make planning fail, only fall back to something safe.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tunable privacy-shield policy.
///
/// All bounds are self-healing: `sanitize` repairs inverted ranges and a
/// zero minimum batch size instead of returning an error. Counts are
/// unsigned, so negative policy values are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldSettings {
    /// Minimum real queries per batch (at least 1)
    pub batch_min: usize,
    /// Maximum real queries per batch
    pub batch_max: usize,
    /// Minimum decoys injected per batch
    pub chaff_per_batch_min: usize,
    /// Maximum decoys injected per batch
    pub chaff_per_batch_max: usize,
    /// Lower bound of the per-batch send delay in ms
    pub intra_batch_jitter_min_ms: u64,
    /// Upper bound of the per-batch send delay in ms
    pub intra_batch_jitter_max_ms: u64,
    /// Lower bound of the between-batch gap in ms
    pub inter_batch_jitter_min_ms: u64,
    /// Upper bound of the between-batch gap in ms
    pub inter_batch_jitter_max_ms: u64,
    /// Rolling-window admission cap on total lookups (real + chaff)
    pub max_lookups_per_hour: u32,
}

impl Default for ShieldSettings {
    fn default() -> Self {
        Self {
            batch_min: 2,
            batch_max: 5,
            chaff_per_batch_min: 1,
            chaff_per_batch_max: 3,
            intra_batch_jitter_min_ms: 250,
            intra_batch_jitter_max_ms: 2_000,
            inter_batch_jitter_min_ms: 1_000,
            inter_batch_jitter_max_ms: 10_000,
            max_lookups_per_hour: 120,
        }
    }
}

impl ShieldSettings {
    /// Return a repaired copy of these settings.
    ///
    /// Repairs applied, in order: `batch_min == 0` is raised to 1, then any
    /// inverted `max < min` pair has its max raised to min. The second
    /// boolean is true when anything changed, so the planner can log it.
    pub fn sanitize(&self) -> (Self, bool) {
        let mut s = *self;

        if s.batch_min == 0 {
            s.batch_min = 1;
        }
        if s.batch_max < s.batch_min {
            s.batch_max = s.batch_min;
        }
        if s.chaff_per_batch_max < s.chaff_per_batch_min {
            s.chaff_per_batch_max = s.chaff_per_batch_min;
        }
        if s.intra_batch_jitter_max_ms < s.intra_batch_jitter_min_ms {
            s.intra_batch_jitter_max_ms = s.intra_batch_jitter_min_ms;
        }
        if s.inter_batch_jitter_max_ms < s.inter_batch_jitter_min_ms {
            s.inter_batch_jitter_max_ms = s.inter_batch_jitter_min_ms;
        }

        let changed = s != *self;
        (s, changed)
    }
}

/// Caller-supplied runtime snapshot for one planning call.
///
/// The rolling counter behind `lookups_used_last_hour` is owned by the
/// caller (see `crate::usage::UsageWindow`); the shield only reads this
/// snapshot and never writes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldContext {
    /// Provider endpoint the plan is destined for
    pub endpoint: String,
    /// Planning clock in ms since the epoch; wall clock when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now_ms: Option<u64>,
    /// Lookups (real + chaff) already sent in the rolling window
    pub lookups_used_last_hour: u32,
}

impl ShieldContext {
    /// Context at the current wall clock with no usage recorded
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            now_ms: None,
            lookups_used_last_hour: 0,
        }
    }

    /// Pin the planning clock (tests, replay)
    pub fn at(mut self, now_ms: u64) -> Self {
        self.now_ms = Some(now_ms);
        self
    }

    /// Set the rolling-window usage snapshot
    pub fn with_usage(mut self, lookups_used_last_hour: u32) -> Self {
        self.lookups_used_last_hour = lookups_used_last_hour;
        self
    }

    /// Resolve the planning clock, falling back to the wall clock
    pub fn resolved_now_ms(&self) -> u64 {
        self.now_ms.unwrap_or_else(wall_clock_ms)
    }
}

/// Current wall clock in ms since the Unix epoch
pub(crate) fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
