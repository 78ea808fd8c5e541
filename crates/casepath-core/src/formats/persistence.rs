//! # Persistence Format
//!
//! Binary serialization for Casepath session records.
//!
//! Format: Header (5 bytes) + postcard-serialized payload.
//! - 4 bytes: Magic ("CASE")
//! - 1 byte: Version
//!
//! Two payload kinds share the header:
//! - a single `SessionRecord` (redb values, HTTP exports)
//! - a `Vec<SessionRecord>` snapshot (file backend)
//!
//! Both directions enforce `MAX_PERSISTENCE_PAYLOAD_SIZE`, so nothing is
//! written that cannot be read back. Size and header are validated before the
//! payload is decoded, and every decoded record is re-validated since
//! deserialization skips constructors.

use crate::session::SessionRecord;
use crate::{CasepathError, primitives};
use serde::Serialize;
use serde::de::DeserializeOwned;

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum allowed payload size for persistence format (64 MB).
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Minimum valid size (header only).
const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all payload data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), CasepathError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(CasepathError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(CasepathError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CasepathError> {
        if bytes.len() < HEADER_SIZE {
            return Err(CasepathError::DeserializationError(
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
// FRAMING
// =============================================================================

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CasepathError> {
    let payload = postcard::to_stdvec(value)
        .map_err(|e| CasepathError::SerializationError(e.to_string()))?;

    let total = HEADER_SIZE + payload.len();
    if total > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(CasepathError::SerializationError(format!(
            "Encoded size {} bytes exceeds maximum allowed {} bytes",
            total, MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let mut bytes = Vec::with_capacity(total);
    bytes.extend_from_slice(&PersistenceHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CasepathError> {
    if bytes.len() < HEADER_SIZE {
        return Err(CasepathError::DeserializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(CasepathError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    PersistenceHeader::from_bytes(bytes)?.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        CasepathError::DeserializationError(format!("Failed to decode payload: {}", e))
    })
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize one session record (header + payload).
pub fn record_to_bytes(record: &SessionRecord) -> Result<Vec<u8>, CasepathError> {
    encode(record)
}

/// Deserialize and validate one session record.
pub fn record_from_bytes(bytes: &[u8]) -> Result<SessionRecord, CasepathError> {
    let record: SessionRecord = decode(bytes)?;
    record.validate()?;
    Ok(record)
}

/// Serialize every record of a store.
pub fn snapshot_to_bytes(records: &[SessionRecord]) -> Result<Vec<u8>, CasepathError> {
    encode(records)
}

/// Deserialize and validate a store snapshot.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Vec<SessionRecord>, CasepathError> {
    let records: Vec<SessionRecord> = decode(bytes)?;
    records.iter().try_for_each(SessionRecord::validate)?;
    Ok(records)
}

// =============================================================================
// TESTS
// =============================================================================
