use crate::constants::SAMPLER_DOMAIN;

/// Counter method: derive the random bytes for sample number `counter`
/// from the session seed.
///
/// blake3( domain || seed || counter_le )
pub fn derive_sample_seed(seed: &[u8; 32], counter: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SAMPLER_DOMAIN);
    hasher.update(seed);
    hasher.update(&counter.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Map random bytes onto `0..pool_len`.
///
/// Uses the first 16 bytes as a little-endian u128 so the modulo bias stays
/// negligible for any realistic roster size. Returns 0 for an empty pool.
pub fn compute_pool_index(random_bytes: &[u8; 32], pool_len: usize) -> usize {
    if pool_len == 0 {
        return 0;
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&random_bytes[..16]);
    let random_value = u128::from_le_bytes(bytes);
    (random_value % pool_len as u128) as usize
}

/// Seed material for sessions that were not given one explicitly.
pub fn seed_from_clock() -> [u8; 32] {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let mut hasher = blake3::Hasher::new();
    hasher.update(SAMPLER_DOMAIN);
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_seed_depends_on_counter() {
        let seed = [7u8; 32];
        assert_eq!(derive_sample_seed(&seed, 3), derive_sample_seed(&seed, 3));
        assert_ne!(derive_sample_seed(&seed, 3), derive_sample_seed(&seed, 4));
        assert_ne!(derive_sample_seed(&seed, 3), derive_sample_seed(&[8u8; 32], 3));
    }

    #[test]
    fn test_empty_pool_index() {
        assert_eq!(compute_pool_index(&[0xFF; 32], 0), 0);
    }

    #[test]
    fn test_pool_index_covers_every_slot() {
        let seed = [1u8; 32];
        let mut seen = [false; 5];
        for counter in 0..500 {
            seen[compute_pool_index(&derive_sample_seed(&seed, counter), 5)] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    proptest! {
        #[test]
        fn pool_index_in_range(random_bytes in any::<[u8; 32]>(), pool_len in 1usize..10_000) {
            prop_assert!(compute_pool_index(&random_bytes, pool_len) < pool_len);
        }
    }
}
