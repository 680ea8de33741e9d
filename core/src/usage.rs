// Usage Window — Caller-owned rolling lookup counter
//
// The shield reads a snapshot of this window and never writes it. The
// caller records what the executor actually sent (real + chaff) and
// snapshots the window into the next planning context. Keeping the state
// here, instead of in a module-global counter, keeps planning pure.

use crate::privacy::settings::ShieldContext;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One rolling hour, the admission window the shield's cap is defined over
pub const HOUR_MS: u64 = 3_600_000;

/// Timestamped lookup counts over a sliding window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    window_ms: u64,
    entries: VecDeque<(u64, u32)>,
}

impl UsageWindow {
    /// Window of one hour — matches `ShieldSettings::max_lookups_per_hour`
    pub fn hourly() -> Self {
        Self::new(HOUR_MS)
    }

    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            entries: VecDeque::new(),
        }
    }

    /// Record lookups sent at `now_ms` (typically
    /// `ExecutionReport::lookups_sent` after a plan finishes or is
    /// abandoned mid-way).
    pub fn record(&mut self, count: u32, now_ms: u64) {
        self.prune(now_ms);
        if count > 0 {
            self.entries.push_back((now_ms, count));
        }
    }

    /// Lookups recorded within the window ending at `now_ms`.
    pub fn used_at(&mut self, now_ms: u64) -> u32 {
        self.prune(now_ms);
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Snapshot this window into a planning context.
    pub fn context(&mut self, endpoint: impl Into<String>, now_ms: u64) -> ShieldContext {
        let used = self.used_at(now_ms);
        ShieldContext::new(endpoint).at(now_ms).with_usage(used)
    }

    fn prune(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(self.window_ms);
        while let Some(&(ts, _)) = self.entries.front() {
            if ts <= cutoff {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for UsageWindow {
    fn default() -> Self {
        Self::hourly()
    }
}
