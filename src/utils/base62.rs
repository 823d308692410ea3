//! Base62 encoding of sequence numbers into short codes.

/// Digits, then uppercase, then lowercase. The order is part of the code
/// format: changing it changes every generated code.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// `u64::MAX` needs 11 base62 digits.
const MAX_LEN: usize = 11;

/// Encodes an integer as a base62 string.
///
/// Most significant digit first, no padding, so distinct inputs always give
/// distinct outputs and `encode(0)` is the only code starting with `'0'`.
///
/// # Examples
///
/// ```
/// use snaplink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_LEN];
    let mut pos = MAX_LEN;

    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % 62) as usize];
        n /= 62;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn test_encode_alphabet_order() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "A");
        assert_eq!(encode(35), "Z");
        assert_eq!(encode(36), "a");
        assert_eq!(encode(61), "z");
    }

    #[test]
    fn test_encode_multi_digit() {
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62 - 1), "zz");
        assert_eq!(encode(62 * 62), "100");
        assert_eq!(encode(100_001), "Q0v");
    }

    #[test]
    fn test_encode_max() {
        let code = encode(u64::MAX);
        assert_eq!(code, "LygHa16AHYF");
        assert_eq!(code.len(), MAX_LEN);
    }

    #[test]
    fn test_encode_no_leading_zero() {
        for n in 1..5_000u64 {
            assert!(!encode(n).starts_with('0'), "leading zero for {n}");
        }
    }

    #[test]
    fn test_encode_injective_over_range() {
        let mut seen = HashSet::new();
        for n in 0..100_000u64 {
            assert!(seen.insert(encode(n)), "collision at {n}");
        }
    }

    #[test]
    fn test_encode_injective_near_max() {
        let mut seen = HashSet::new();
        for n in (u64::MAX - 10_000)..=u64::MAX {
            assert!(seen.insert(encode(n)), "collision at {n}");
        }
    }

    #[test]
    fn test_encode_length_grows_logarithmically() {
        assert_eq!(encode(61).len(), 1);
        assert_eq!(encode(62).len(), 2);
        assert_eq!(encode(238_327).len(), 3);
        assert_eq!(encode(238_328).len(), 4);
    }
}
