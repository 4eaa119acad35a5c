//! Deterministic 64-bit FNV-1a hashing.
//!
//! Shell identifiers must be identical across runs and platforms, so the
//! randomly seeded hashers of the standard library are not an option here.

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

#[derive(Debug, Clone, Copy)]
pub struct Fnv1a {
    state: u64,
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self { state: FNV_OFFSET }
    }
}

impl Fnv1a {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn finish(&self) -> u64 {
        self.state
    }
}

/// Stable code for a textual name, used to key enum variants independently
/// of their declaration order.
pub fn stable_code(name: &str) -> u64 {
    let mut hasher = Fnv1a::new();
    hasher.write_bytes(name.as_bytes());
    hasher.finish()
}

pub fn hash_words(words: &[u64]) -> u64 {
    let mut hasher = Fnv1a::new();
    for &w in words {
        hasher.write_u64(w);
    }
    hasher.finish()
}

/// Folds a 64-bit hash into the 32-bit index space of an unfolded fingerprint.
pub fn fold_to_u32(hash: u64) -> u32 {
    ((hash >> 32) ^ (hash & 0xFFFF_FFFF)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_hashes_to_offset_basis() {
        assert_eq!(Fnv1a::new().finish(), FNV_OFFSET);
    }

    #[test]
    fn known_fnv1a_vector_for_single_byte() {
        // FNV-1a 64 of "a" is 0xaf63dc4c8601ec8c.
        assert_eq!(stable_code("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn hash_words_is_order_sensitive() {
        assert_ne!(hash_words(&[1, 2]), hash_words(&[2, 1]));
        assert_eq!(hash_words(&[1, 2]), hash_words(&[1, 2]));
    }

    #[test]
    fn fold_to_u32_mixes_both_halves() {
        assert_eq!(fold_to_u32(0x0000_0001_0000_0000), 1);
        assert_eq!(fold_to_u32(0x0000_0000_0000_0002), 2);
        assert_eq!(fold_to_u32(0x0000_0003_0000_0003), 0);
    }
}
