//! Stable string hashing used to derive per-stream seeds.
//!
//! The std and Fx hashers are free to change between releases or differ between 32- and
//! 64-bit targets, so stream names are hashed with 64-bit FNV-1a, whose output is fixed.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[must_use]
pub fn hash_str(data: &str) -> u64 {
    data.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
