use crate::{
    clock::{Clock, SystemClock},
    error::Error,
    layout::{
        self, IdParts, EPOCH, EPOCH_UNIX_MILLIS, MAX_BACKWARD_DRIFT_MS, MAX_NODE_ID, MAX_SEQUENCE,
        MAX_TIMESTAMP_MS,
    },
};
use jiff::SignedDuration;
use std::cmp::Ordering;
use std::sync::Mutex;
use tracing::{debug, error, trace, warn};

#[derive(Debug, Default)]
struct GeneratorState {
    /// Milliseconds since the epoch of the last minted ID.
    last_time: i64,
    /// Sequence used for `last_time`.
    sequence: u16,
}

/// Thread-safe generator of time-ordered 64-bit IDs.
///
/// One instance per node. IDs from different instances only stay unique if
/// every instance was given a distinct node id.
pub struct IdMaker<C: Clock = SystemClock> {
    node_id: u16,
    /// Node id already in place, timestamp and sequence left at zero.
    node_contribution: IdParts,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl IdMaker<SystemClock> {
    /// Creates a generator backed by the system clock.
    ///
    /// Fails with [`Error::InvalidArgument`] unless `node_id` is in `0..=2047`.
    pub fn new(node_id: i64) -> Result<Self, Error> {
        Self::with_clock(node_id, SystemClock)
    }
}

impl<C: Clock> IdMaker<C> {
    /// Like [`IdMaker::new`], reading time from `clock` instead of the system clock.
    pub fn with_clock(node_id: i64, clock: C) -> Result<Self, Error> {
        let node_id = u16::try_from(node_id)
            .ok()
            .filter(|id| i64::from(*id) <= MAX_NODE_ID)
            .ok_or(Error::InvalidArgument {
                node_id,
                max_node_id: MAX_NODE_ID,
            })?;

        let now = clock.now();
        if now < EPOCH {
            return Err(Error::EpochAhead { epoch: EPOCH, now });
        }

        debug!(node_id, "id maker ready");

        Ok(Self {
            node_id,
            node_contribution: IdParts::new().with_node_id(node_id),
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    /// Node id embedded in every ID this generator mints.
    pub fn node_id(&self) -> i64 {
        i64::from(self.node_id)
    }

    /// Mints the next ID.
    ///
    /// The whole operation runs under one lock, including waits:
    /// - if the sequence for the current millisecond is exhausted, spin until
    ///   the clock reaches the next millisecond
    /// - if the clock moved backwards by at most 10s, sleep until it should
    ///   have caught up and start over
    /// - if it moved back further, fail with [`Error::ClockRegression`]
    ///
    /// On error the generator state is left untouched.
    pub fn next_id(&self) -> Result<i64, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let (now, sequence) = loop {
            let mut now = self.elapsed_ms();
            let diff = now - state.last_time;

            match diff.cmp(&0) {
                Ordering::Equal => {
                    let sequence = (state.sequence + 1) & MAX_SEQUENCE;
                    if sequence == 0 {
                        trace!(last_ms = state.last_time, "sequence exhausted, spinning");
                        while now <= state.last_time {
                            std::hint::spin_loop();
                            now = self.elapsed_ms();
                        }
                    }
                    break (now, sequence);
                }
                Ordering::Greater => break (now, 0),
                Ordering::Less => {
                    if diff < -MAX_BACKWARD_DRIFT_MS {
                        error!(
                            last_ms = state.last_time,
                            now_ms = now,
                            drift_ms = -diff,
                            "clock moved backwards beyond tolerance"
                        );
                        return Err(Error::ClockRegression {
                            last: layout::time_at(state.last_time),
                            now: layout::time_at(now),
                        });
                    }
                    warn!(
                        last_ms = state.last_time,
                        now_ms = now,
                        drift_ms = -diff,
                        "clock moved backwards, waiting for it to catch up"
                    );
                    self.clock.sleep(SignedDuration::from_millis(-diff));
                }
            }
        };

        // `now >= last_time >= 0` here, so only the upper bound needs a check.
        if now > MAX_TIMESTAMP_MS {
            return Err(Error::OverTimeLimit { elapsed_ms: now });
        }

        state.last_time = now;
        state.sequence = sequence;

        Ok(self
            .node_contribution
            .with_timestamp(now as u64)
            .with_sequence(sequence)
            .into())
    }

    /// Smallest ID that can be minted at or after `unix_seconds`.
    ///
    /// See [`layout::first_id_for_unix_time`].
    pub fn first_id_for_unix_time(&self, unix_seconds: i64) -> i64 {
        layout::first_id_for_unix_time(unix_seconds)
    }

    fn elapsed_ms(&self) -> i64 {
        self.clock.now().as_millisecond() - EPOCH_UNIX_MILLIS
    }
}
