// Capacity Gate — Rolling-window admission control
//
// Pure sizing computation: how many real queries fit under the hourly cap,
// and how much room is left over for chaff. The rolling counter itself is
// caller-owned; this gate only reads the snapshot in the context.

use serde::{Deserialize, Serialize};

/// Outcome of admission control for one planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    /// Real queries admitted, in caller order from the front of the list
    pub admitted: usize,
    /// Real queries past capacity, never scheduled
    pub dropped: usize,
    /// Shared decoy pool left after real admission
    pub chaff_budget: usize,
}

impl Admission {
    /// Nothing admitted, everything dropped
    pub fn rejected(real_count: usize) -> Self {
        Self {
            admitted: 0,
            dropped: real_count,
            chaff_budget: 0,
        }
    }

    /// True when planning should short-circuit to an empty plan
    pub fn is_empty(&self) -> bool {
        self.admitted == 0
    }
}

/// Compute admission under the hourly cap.
///
/// The drop policy is earliest-first: the first `admitted` queries in
/// caller-supplied order get through, the rest are dropped with no
/// reordering. With zero capacity or zero real queries the gate admits
/// nothing and leaves no chaff budget — chaff is only generated when there
/// is real traffic to hide.
pub fn admit(real_count: usize, max_lookups_per_hour: u32, lookups_used_last_hour: u32) -> Admission {
    let capacity = max_lookups_per_hour.saturating_sub(lookups_used_last_hour) as usize;

    if capacity == 0 || real_count == 0 {
        return Admission::rejected(real_count);
    }

    let admitted = real_count.min(capacity);
    Admission {
        admitted,
        dropped: real_count - admitted,
        chaff_budget: capacity - admitted,
    }
}
