//! # Formats Module
//!
//! Canonical serialization formats for finalized evaluations.

pub mod persistence;

pub use persistence::{
    record_from_bytes, record_to_bytes, snapshot_checksum, PersistenceHeader,
    MAX_SNAPSHOT_PAYLOAD_SIZE,
};

#[cfg(feature = "crypto-hash")]
pub use persistence::snapshot_hash;
