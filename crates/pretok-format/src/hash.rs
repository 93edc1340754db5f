//! String hash used by every on-disk table.

/// Bernstein hash over the key bytes (terminator excluded), finalized with
/// `r + (r >> 5)`. Readers recompute this exact function, so it is part of
/// the file format and must not change.
pub fn bernstein_hash(key: &[u8]) -> u32 {
    let mut r: u32 = 0;
    for &b in key {
        r = r.wrapping_mul(33).wrapping_add(b as u32);
    }
    r.wrapping_add(r >> 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key() {
        assert_eq!(bernstein_hash(b""), 0);
    }

    #[test]
    fn single_byte() {
        // r = 97; 97 + (97 >> 5) = 100
        assert_eq!(bernstein_hash(b"a"), 100);
    }

    #[test]
    fn multi_byte() {
        // r = ((105 * 33) + 110) = 3575 for "in", then * 33 + 116 = 118091
        // for "int"; 118091 + (118091 >> 5) = 121781
        assert_eq!(bernstein_hash(b"int"), 121781);
    }

    #[test]
    fn distinct_keys_distinct_hashes() {
        assert_ne!(bernstein_hash(b"foo"), bernstein_hash(b"bar"));
    }
}
