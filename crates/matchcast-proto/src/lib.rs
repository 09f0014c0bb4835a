//! Wire format for the match scorekeeping event stream.
//!
//! The scorekeeper pushes one JSON object per websocket text frame. The only
//! field we rely on is `updateType`; everything else in the object is carried
//! through untouched and ignored.
//!
//! Decoding is deliberately lenient about the update type: [`MatchUpdate`]
//! keeps the raw string so that an update type we do not recognize still
//! reaches the consumer, which reports it as a typed error instead of losing
//! it inside the network worker.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod update;

pub use errors::{ProtoError, Result};
pub use update::{MatchUpdate, UpdateType};
