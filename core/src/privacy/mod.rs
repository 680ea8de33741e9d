// Privacy Shield — Traffic-correlation resistance for wallet lookups
//
// Takes the real lookups a wallet needs and emits time-jittered,
// decoy-padded batches, so an observer watching traffic to a provider
// cannot recover request timing or request-set membership.

pub mod batch;
pub mod capacity;
pub mod chaff;
pub mod query;
pub mod rand_util;
pub mod schedule;
pub mod settings;
pub mod shield;

pub use capacity::{admit, Admission};
pub use query::{Batch, Plan, QueryKind, RealQuery, ScheduledQuery};
pub use settings::{ShieldContext, ShieldSettings};
pub use shield::{plan, plan_with_rng};
