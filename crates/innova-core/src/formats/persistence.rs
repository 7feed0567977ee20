//! # Persistence Format
//!
//! Binary serialization for finalized evaluation records.
//!
//! Format: Header (5 bytes) + postcard-serialized record data.
//! - 4 bytes: Magic ("INNV")
//! - 1 byte: Version
//!
//! File I/O lives in the app layer; this module is a pure transformation.
//!
//! Pre-deserialization validation guards against corrupted or hostile
//! input: the payload size limit and the header are checked before any
//! payload parsing happens.

use crate::primitives;
use crate::session::EvaluationRecord;
use crate::types::InnovaError;

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed payload size for the snapshot format.
///
/// Prevents memory exhaustion from malicious or corrupted data. 64 MB is
/// far beyond any real evaluation record.
///
/// Validated BEFORE attempting deserialization.
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Minimum valid snapshot size (header only).
const MIN_SNAPSHOT_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all record data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), InnovaError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(InnovaError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(InnovaError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InnovaError> {
        if bytes.len() < MIN_SNAPSHOT_SIZE {
            return Err(InnovaError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize an evaluation record to bytes (header + payload).
pub fn record_to_bytes(record: &EvaluationRecord) -> Result<Vec<u8>, InnovaError> {
    let header = PersistenceHeader::new();

    let payload = postcard::to_stdvec(record)
        .map_err(|e| InnovaError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_SNAPSHOT_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize an evaluation record from bytes.
///
/// Validates, in order and before payload parsing:
/// 1. Minimum data size (header must be present)
/// 2. Maximum payload size (prevents memory exhaustion)
/// 3. Header magic bytes and version
pub fn record_from_bytes(bytes: &[u8]) -> Result<EvaluationRecord, InnovaError> {
    if bytes.len() < MIN_SNAPSHOT_SIZE {
        return Err(InnovaError::SerializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(InnovaError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_SNAPSHOT_SIZE..];
    let record: EvaluationRecord = postcard::from_bytes(payload).map_err(|e| {
        InnovaError::SerializationError(format!("Failed to deserialize record data: {}", e))
    })?;

    Ok(record)
}

/// Deterministic XOR-fold checksum over snapshot bytes.
///
/// Not cryptographic; pairs the snapshot with a cheap integrity value for
/// transport. Use [`snapshot_hash`] where tamper evidence matters.
#[must_use]
pub fn snapshot_checksum(bytes: &[u8]) -> u64 {
    let mut checksum: u64 = 0;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        checksum ^= u64::from_le_bytes(word);
        checksum = checksum.rotate_left(7);
    }
    checksum
}

/// BLAKE3 hex digest of snapshot bytes for audit trails.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn snapshot_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================
