use jiff::Timestamp;
use thiserror::Error;

/// Errors returned by IdMaker construction and ID generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid node id {node_id}; expected 0..={max_node_id}")]
    InvalidArgument { node_id: i64, max_node_id: i64 },
    /// The clock jumped backwards further than the generator is willing to wait out.
    ///
    /// Treat this as fatal: the local clock is not trustworthy anymore.
    #[error("clock moved backwards: last id was minted at {last}, clock now reads {now}")]
    ClockRegression { last: Timestamp, now: Timestamp },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("overtime limit: {elapsed_ms}ms since epoch does not fit in the timestamp field")]
    OverTimeLimit { elapsed_ms: i64 },
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
