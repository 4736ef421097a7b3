//! Process-instance fingerprint.
//!
//! Two processes generating against the same downstream system must not
//! derive the same candidate bases from the same wall-clock instant. The
//! fingerprint folds a random UUID and the process id through SHA-256 into
//! a 64-bit value that is stable for the life of one generator and almost
//! certainly distinct across processes.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Derive a fingerprint for this process instance.
///
/// Called once at generator construction; the value is held for the
/// generator's lifetime. Not cryptographic — it only has to decorrelate
/// processes, not resist prediction.
pub fn process_fingerprint() -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
