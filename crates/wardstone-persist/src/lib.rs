//! Persistent record store contract and payload codecs for Wardstone.
//!
//! The world manager survives restarts by persisting a handful of small
//! versioned text records, one per event family, keyed by a reserved
//! [`SaveId`](wardstone_types::SaveId). The actual storage engine (SQL
//! table, key-value store, flat file) is an external collaborator behind
//! the [`RecordBackend`] trait; this crate ships the contract, an
//! in-memory implementation for tests and embedding, and the codecs that
//! turn live state into wire-stable payloads.
//!
//! # Recovery semantics
//!
//! - An absent or empty payload means "never persisted": decoders return
//!   the event family's hard-coded defaults without complaint.
//! - A malformed payload is logged and replaced by defaults; it never
//!   crashes the process or propagates an error.
//! - Absolute UNIX timestamps on disk become relative millisecond
//!   countdowns at load time. A stored timestamp of zero means "no timer
//!   pending"; a nonzero timestamp always yields an armed countdown, so
//!   a deadline that passed while the server was down fires on the first
//!   tick after startup.

pub mod backend;
pub mod error;
pub mod records;

pub use backend::{MemoryBackend, RecordBackend};
pub use error::PersistError;
pub use records::{
    ConditionRecord, FestivalRecord, HarbingerRecord, RotationRecord, decode_era, encode_era,
};
