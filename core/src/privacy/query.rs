// Shield Queries — Data carried through the privacy shield
//
// Real lookups enter as `RealQuery`, leave as shuffled `ScheduledQuery`
// entries inside timed batches. Decoys share the exact same shape so an
// observer of the outgoing stream cannot separate them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The kinds of lookup a watch-only wallet performs against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    /// Fetch a raw transaction by txid
    TxRaw,
    /// Fetch a merkle proof for a txid
    TxProof,
    /// Fetch a block header by height or hash
    BlockHeader,
}

impl QueryKind {
    /// Wire name used by provider protocols
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::TxRaw => "tx-raw",
            QueryKind::TxProof => "tx-proof",
            QueryKind::BlockHeader => "block-header",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lookup the wallet actually needs to perform.
///
/// `target` is opaque to the shield: a 64-hex txid for `tx-raw`/`tx-proof`,
/// a height or block hash for `block-header`. `meta` is caller bookkeeping
/// carried through unmodified; the shield never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealQuery {
    pub kind: QueryKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl RealQuery {
    /// Create a query with no metadata
    pub fn new(kind: QueryKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            meta: None,
        }
    }

    /// Attach caller metadata
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// A query as it appears inside a planned batch — real or decoy.
///
/// `id` is a fresh random identifier used only to match a response back to
/// its request; it is never reused across queries. `is_chaff` is visible to
/// the in-process executor so it can discard decoy responses, but it must
/// never cross the executor's own boundary: callers of the shield see only
/// real results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledQuery {
    pub id: String,
    pub kind: QueryKind,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub is_chaff: bool,
}

impl ScheduledQuery {
    /// Wrap a real query for scheduling
    pub fn from_real(query: RealQuery) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: query.kind,
            target: query.target,
            meta: query.meta,
            is_chaff: false,
        }
    }

    /// Build a decoy. Decoys carry no caller metadata.
    pub fn decoy(kind: QueryKind, target: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            target,
            meta: None,
            is_chaff: true,
        }
    }
}

/// An ordered group of queries dispatched together at one scheduled time.
///
/// The real queries in a batch are a contiguous slice of the admitted
/// sequence; its decoys are additional. After assembly the two are shuffled
/// together, so position within the batch carries no information about
/// which entries are real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub queries: Vec<ScheduledQuery>,
    /// Absolute send time in ms, same clock as the caller-supplied now
    pub send_at_ms: u64,
}

impl Batch {
    /// Number of real (non-decoy) queries in this batch
    pub fn real_count(&self) -> usize {
        self.queries.iter().filter(|q| !q.is_chaff).count()
    }

    /// Number of decoys in this batch
    pub fn chaff_count(&self) -> usize {
        self.queries.iter().filter(|q| q.is_chaff).count()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// The shield's output: scheduled batches plus accounting totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Provider endpoint every batch is destined for
    pub endpoint: String,
    /// Batches in dispatch order, `send_at_ms` strictly increasing
    pub batches: Vec<Batch>,
    /// Real queries admitted and scheduled
    pub total_real: usize,
    /// Decoys generated across all batches
    pub total_chaff: usize,
    /// Real queries that exceeded capacity and were never scheduled
    pub dropped_real: usize,
    /// Always 0: chaff is capped at generation time, never dropped after.
    /// Kept for accounting symmetry with `dropped_real`.
    pub dropped_chaff: usize,
}

impl Plan {
    /// An empty plan: nothing admitted, everything dropped
    pub fn empty(endpoint: impl Into<String>, dropped_real: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            batches: Vec::new(),
            total_real: 0,
            total_chaff: 0,
            dropped_real,
            dropped_chaff: 0,
        }
    }

    /// Total queries (real + chaff) this plan will emit
    pub fn total_queries(&self) -> usize {
        self.total_real + self.total_chaff
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
