//! Distributed generator of time-ordered 64-bit IDs.
//!
//! Each [`IdMaker`] is configured with a node id and mints IDs without talking
//! to any other node. IDs carry the millisecond they were minted at, so they
//! sort roughly by creation time and can be decoded back into their parts with
//! the helpers in [`layout`].

mod clock;
pub mod error;
pub mod layout;
mod maker;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use layout::{
    decode, first_id_for_time, first_id_for_unix_time, node_id_of, sequence_of, time_of,
    time_string_of, DecodedId, IdParts, EPOCH, EPOCH_UNIX_SECONDS,
};
pub use maker::IdMaker;
