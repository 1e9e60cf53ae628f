//! Stable, non-cryptographic digests for deriving node labels.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - output: 16 lowercase hex digits
//!
//! Blank node labels derived from a digest of the source locator stay the same
//! across runs, which keeps repeated conversions byte-identical.

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

pub fn fnv1a64_hex(bytes: &[u8]) -> String {
    format!("{:016x}", fnv1a64(bytes))
}
