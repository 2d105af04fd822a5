//! Bit layout of an ID and the pure helpers that take one apart.
//!
//! From the most significant bit down, an ID is made of:
//!
//! ```text
//! [ timestamp: 41 bits ][ node id: 11 bits ][ sequence: 12 bits ]
//! ```
//!
//! The timestamp counts milliseconds since [`EPOCH`]. Its topmost bit doubles
//! as the sign bit of the `i64`, so generators never fill it: minting stops at
//! [`MAX_TIMESTAMP_MS`] (2055-02-27 20:06:11 UTC) and every minted ID is a
//! positive number. Decoding still reads all 41 bits, which keeps the helpers
//! total over hand-made or foreign values.

use jiff::{SignedDuration, Timestamp};
use modular_bitfield::prelude::*;
use serde::{Deserialize, Serialize};

/// Unix time (seconds) of the epoch, 2020-04-26 00:12:24 UTC.
pub const EPOCH_UNIX_SECONDS: i64 = 1_587_859_944;
/// Zero point of the timestamp field.
pub const EPOCH: Timestamp = Timestamp::constant(EPOCH_UNIX_SECONDS, 0);
pub(crate) const EPOCH_UNIX_MILLIS: i64 = EPOCH_UNIX_SECONDS * 1_000;

pub const TIMESTAMP_BITS: u32 = 41;
pub const NODE_ID_BITS: u32 = 11;
pub const SEQUENCE_BITS: u32 = 12;

pub const MAX_NODE_ID: i64 = (1 << NODE_ID_BITS) - 1;
pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
/// Last millisecond a generator may mint for; one more would set the sign bit.
pub const MAX_TIMESTAMP_MS: i64 = (1 << (TIMESTAMP_BITS - 1)) - 1;
/// How far the clock may jump backwards before minting fails outright.
pub const MAX_BACKWARD_DRIFT_MS: i64 = 10_000;

const NODE_ID_SHIFT: u32 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u32 = NODE_ID_BITS + SEQUENCE_BITS;

/// Fields of an ID, least significant first.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// 12 bits for sequence number (resets every millisecond).
    pub sequence: B12,
    /// 11 bits for node ID (allows up to 2048 nodes).
    pub node_id: B11,
    /// 41 bits for timestamp (milliseconds since [`EPOCH`]).
    pub timestamp: B41,
}

impl From<i64> for IdParts {
    fn from(id: i64) -> Self {
        let raw = id as u64;
        IdParts::new()
            .with_sequence((raw & u64::from(MAX_SEQUENCE)) as u16)
            .with_node_id(((raw >> NODE_ID_SHIFT) & MAX_NODE_ID as u64) as u16)
            .with_timestamp(raw >> TIMESTAMP_SHIFT)
    }
}

impl From<IdParts> for i64 {
    fn from(parts: IdParts) -> Self {
        i64::from_le_bytes(parts.into_bytes())
    }
}

impl std::fmt::Debug for IdParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdParts")
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

/// Every field of an ID, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedId {
    pub id: i64,
    pub node_id: i64,
    pub sequence: i64,
    /// Milliseconds since [`EPOCH`].
    pub elapsed_ms: i64,
    pub time: Timestamp,
}

pub fn decode(id: i64) -> DecodedId {
    let parts = IdParts::from(id);
    DecodedId {
        id,
        node_id: i64::from(parts.node_id()),
        sequence: i64::from(parts.sequence()),
        elapsed_ms: parts.timestamp() as i64,
        time: time_at(parts.timestamp() as i64),
    }
}

/// Node id the ID was minted by.
pub fn node_id_of(id: i64) -> i64 {
    (id >> NODE_ID_SHIFT) & MAX_NODE_ID
}

/// Per-millisecond sequence number of the ID.
pub fn sequence_of(id: i64) -> i64 {
    id & i64::from(MAX_SEQUENCE)
}

/// Millisecond the ID was minted at.
///
/// All 41 timestamp bits are read as unsigned, sign bit included, so a
/// negative (never minted) ID decodes to a time after 2055, up to 2089, and
/// never to one before [`EPOCH`].
pub fn time_of(id: i64) -> Timestamp {
    time_at(IdParts::from(id).timestamp() as i64)
}

/// [`time_of`] rendered as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn time_string_of(id: i64) -> String {
    time_of(id).strftime("%Y-%m-%d %H:%M:%S").to_string()
}

/// Smallest ID that can be minted at or after the given Unix second.
///
/// Seconds at or before [`EPOCH`] give `0`. Seconds past the end of the
/// minting window give `i64::MAX`, which is above every mintable ID.
///
/// Meant for range scans over tables keyed by these IDs:
/// `id >= first_id_for_unix_time(from) AND id < first_id_for_unix_time(to)`.
pub fn first_id_for_unix_time(unix_seconds: i64) -> i64 {
    let elapsed_ms = unix_seconds
        .saturating_sub(EPOCH_UNIX_SECONDS)
        .saturating_mul(1_000);
    first_id_at(elapsed_ms)
}

/// Like [`first_id_for_unix_time`], at millisecond precision.
pub fn first_id_for_time(time: Timestamp) -> i64 {
    first_id_at(time.as_millisecond().saturating_sub(EPOCH_UNIX_MILLIS))
}

fn first_id_at(elapsed_ms: i64) -> i64 {
    if elapsed_ms > MAX_TIMESTAMP_MS {
        return i64::MAX;
    }
    let elapsed_ms = elapsed_ms.max(0);
    IdParts::new().with_timestamp(elapsed_ms as u64).into()
}

/// Instant `elapsed_ms` milliseconds after [`EPOCH`].
pub(crate) fn time_at(elapsed_ms: i64) -> Timestamp {
    EPOCH + SignedDuration::from_millis(elapsed_ms)
}
