//! Integer square root over u128.
//!
//! Newton's method with a power-of-two initial guess derived from the bit
//! length, so convergence takes a handful of iterations even at the top of
//! the u128 range. Returns `floor(sqrt(n))`.

/// `floor(sqrt(n))` for any u128.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Initial guess: 2^ceil(bits/2) >= sqrt(n), so the sequence is
    // monotonically decreasing from above.
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_values() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(9), 3);
    }

    #[test]
    fn perfect_squares() {
        for k in [10u128, 100, 1_000, 1_000_000, 1_000_000_000_000] {
            assert_eq!(isqrt(k * k), k);
            assert_eq!(isqrt(k * k - 1), k - 1);
            assert_eq!(isqrt(k * k + 1), k);
        }
    }

    #[test]
    fn extreme_values() {
        assert_eq!(isqrt(u128::MAX), (1u128 << 64) - 1);
        let k = u64::MAX as u128;
        assert_eq!(isqrt(k * k), k);
    }

    proptest! {
        #[test]
        fn floor_property(n in any::<u128>()) {
            let r = isqrt(n);
            // r² <= n < (r+1)²
            prop_assert!(r.checked_mul(r).map(|sq| sq <= n).unwrap_or(false) || n == 0);
            match r.checked_add(1).and_then(|r1| r1.checked_mul(r1)) {
                Some(upper) => prop_assert!(n < upper),
                // (r+1)² overflowed u128, trivially above n.
                None => {}
            }
        }

        #[test]
        fn monotonic(a in any::<u128>(), b in any::<u128>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(isqrt(lo) <= isqrt(hi));
        }
    }
}
