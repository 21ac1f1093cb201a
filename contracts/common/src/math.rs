//! Fixed-Point Divider
//!
//! Exact `floor(m1 * m2 / d)` for 64-bit operands. The product can need 128
//! bits, so it is kept as a `(high, low)` pair of 64-bit words and divided
//! by long division in 32-bit digits. No intermediate value ever exceeds 64
//! bits, matching a host that only offers 64-bit arithmetic plus a wide
//! multiply.

use crate::constants::ledger::MAX_INT_ARG_BYTES;
use crate::errors::{AsaswapError, AsaswapResult};

const HALF_BITS: u32 = 32;
const HALF_MASK: u64 = 0xFFFF_FFFF;
const HALF_BASE: u64 = 1 << HALF_BITS;

/// Full double-width product of two 64-bit words as `(high, low)`
pub fn wide_mul(a: u64, b: u64) -> (u64, u64) {
    let (a1, a0) = (a >> HALF_BITS, a & HALF_MASK);
    let (b1, b0) = (b >> HALF_BITS, b & HALF_MASK);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    // Three 32-bit terms, cannot overflow
    let mid = (p00 >> HALF_BITS) + (p01 & HALF_MASK) + (p10 & HALF_MASK);

    let low = (mid << HALF_BITS) | (p00 & HALF_MASK);
    let high = p11 + (p01 >> HALF_BITS) + (p10 >> HALF_BITS) + (mid >> HALF_BITS);
    (high, low)
}

/// Divide the double-width value `(high, low)` by `d`
///
/// Returns `(quotient, remainder)`.
///
/// # Errors
/// - `DivisionByZero` if `d == 0`
/// - `Overflow` if the quotient does not fit in 64 bits (`high >= d`)
pub fn wide_div(high: u64, low: u64, d: u64) -> AsaswapResult<(u64, u64)> {
    if d == 0 {
        return Err(AsaswapError::DivisionByZero);
    }
    if high >= d {
        return Err(AsaswapError::Overflow);
    }

    // Normalize so the divisor's top bit is set
    let shift = d.leading_zeros();
    let v = d << shift;
    let vn1 = v >> HALF_BITS;
    let vn0 = v & HALF_MASK;

    let un32 = if shift == 0 {
        high
    } else {
        (high << shift) | (low >> (64 - shift))
    };
    let un10 = low << shift;
    let un1 = un10 >> HALF_BITS;
    let un0 = un10 & HALF_MASK;

    let q1 = estimate_digit(un32, un1, vn1, vn0);
    // Exact value is below v, so wrapping arithmetic yields it
    let un21 = (un32 << HALF_BITS)
        .wrapping_add(un1)
        .wrapping_sub(q1.wrapping_mul(v));

    let q0 = estimate_digit(un21, un0, vn1, vn0);
    let rem = (un21 << HALF_BITS)
        .wrapping_add(un0)
        .wrapping_sub(q0.wrapping_mul(v));

    Ok(((q1 << HALF_BITS) | q0, rem >> shift))
}

/// One 32-bit quotient digit of `(top * 2^32 + next) / (vn1 * 2^32 + vn0)`
///
/// Requires `top < vn1 * 2^32 + vn0` and `vn1 >= 2^31`.
fn estimate_digit(top: u64, next: u64, vn1: u64, vn0: u64) -> u64 {
    let mut q = top / vn1;
    let mut rhat = top - q * vn1;

    // At most two corrections for a normalized divisor
    while q >= HALF_BASE || q * vn0 > ((rhat << HALF_BITS) | next) {
        q -= 1;
        rhat += vn1;
        if rhat >= HALF_BASE {
            break;
        }
    }
    q
}

/// Calculate `floor(m1 * m2 / d)` without overflow or precision loss
///
/// # Arguments
/// * `m1` - First multiplier
/// * `m2` - Second multiplier
/// * `d` - Divisor
///
/// # Errors
/// - `DivisionByZero` if `d == 0`
/// - `Overflow` if the exact quotient exceeds `u64::MAX`
pub fn mul_div(m1: u64, m2: u64, d: u64) -> AsaswapResult<u64> {
    let (high, low) = wide_mul(m1, m2);
    let (quotient, _) = wide_div(high, low, d)?;
    Ok(quotient)
}

/// Decode a big-endian unsigned integer argument of at most 8 bytes
pub fn btoi(bytes: &[u8]) -> AsaswapResult<u64> {
    if bytes.len() > MAX_INT_ARG_BYTES {
        return Err(AsaswapError::InvalidInteger { len: bytes.len() });
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/// Encode an integer as an 8-byte big-endian argument
pub fn itob(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> AsaswapResult<u64> {
    a.checked_add(b).ok_or(AsaswapError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference(m1: u64, m2: u64, d: u64) -> Option<u64> {
        let q = (m1 as u128 * m2 as u128) / d as u128;
        u64::try_from(q).ok()
    }

    #[test]
    fn test_wide_mul_extremes() {
        assert_eq!(wide_mul(0, u64::MAX), (0, 0));
        assert_eq!(wide_mul(1, u64::MAX), (0, u64::MAX));
        assert_eq!(wide_mul(u64::MAX, u64::MAX), (u64::MAX - 1, 1));
        assert_eq!(wide_mul(1 << 32, 1 << 32), (1, 0));
    }

    #[test]
    fn test_mul_div_small_values() {
        assert_eq!(mul_div(6, 7, 3).unwrap(), 14);
        assert_eq!(mul_div(10, 10, 3).unwrap(), 33); // floor
        assert_eq!(mul_div(0, 12345, 7).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_full_width_product() {
        // (2^64 - 1)^2 / (2^64 - 1) = 2^64 - 1
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);

        // Product close to 2^128 with a quotient just below 2^64
        let m = u64::MAX - 2;
        assert_eq!(mul_div(m, u64::MAX, u64::MAX - 1).unwrap(), reference(m, u64::MAX, u64::MAX - 1).unwrap());
    }

    #[test]
    fn test_mul_div_pool_ratio() {
        // 1,000 primary in against 1,000,000 / 2,000,000 reserves
        assert_eq!(mul_div(1_000, 2_000_000, 1_000_000).unwrap(), 2_000);

        // Token amounts near the 62-bit range
        let a = 3_000_000_000_000_000_000u64;
        let b = 4_000_000_000_000_000_000u64;
        assert_eq!(mul_div(a, b, b).unwrap(), a);
    }

    #[test]
    fn test_mul_div_zero_divisor() {
        assert_eq!(mul_div(1, 1, 0), Err(AsaswapError::DivisionByZero));
        assert_eq!(mul_div(0, 0, 0), Err(AsaswapError::DivisionByZero));
    }

    #[test]
    fn test_mul_div_quotient_overflow() {
        assert_eq!(mul_div(u64::MAX, 2, 1), Err(AsaswapError::Overflow));
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX - 1), Err(AsaswapError::Overflow));
    }

    #[test]
    fn test_wide_div_remainder() {
        let (high, low) = wide_mul(1 << 63, 10);
        let (q, r) = wide_div(high, low, 7).unwrap();
        let n = (1u128 << 63) * 10;
        assert_eq!(q as u128, n / 7);
        assert_eq!(r as u128, n % 7);
    }

    #[test]
    fn test_btoi() {
        assert_eq!(btoi(&[]).unwrap(), 0);
        assert_eq!(btoi(&[0x01, 0x00]).unwrap(), 256);
        assert_eq!(btoi(&itob(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(btoi(&[0u8; 9]), Err(AsaswapError::InvalidInteger { len: 9 }));
    }

    #[test]
    fn test_safe_add() {
        assert_eq!(safe_add(1_000, 2_000).unwrap(), 3_000);
        assert_eq!(safe_add(u64::MAX, 1), Err(AsaswapError::Overflow));
    }

    proptest! {
        #[test]
        fn prop_wide_mul_matches_u128(a: u64, b: u64) {
            let (high, low) = wide_mul(a, b);
            let expected = a as u128 * b as u128;
            prop_assert_eq!(((high as u128) << 64) | low as u128, expected);
        }

        #[test]
        fn prop_mul_div_exact(m1: u64, m2: u64, d in 1u64..=u64::MAX) {
            match reference(m1, m2, d) {
                Some(expected) => prop_assert_eq!(mul_div(m1, m2, d).unwrap(), expected),
                None => prop_assert_eq!(mul_div(m1, m2, d), Err(AsaswapError::Overflow)),
            }
        }

        #[test]
        fn prop_mul_div_exact_fitting_quotient(m1: u64, m2: u64, extra in 0u64..1_000) {
            // Divisor at least the larger multiplier keeps the quotient in range
            let d = m1.max(m2).max(1).saturating_add(extra);
            prop_assert_eq!(mul_div(m1, m2, d).unwrap(), reference(m1, m2, d).unwrap());
        }

        #[test]
        fn prop_zero_divisor_faults(m1: u64, m2: u64) {
            prop_assert_eq!(mul_div(m1, m2, 0), Err(AsaswapError::DivisionByZero));
        }
    }
}
