//! Checked modular arithmetic for merging periodic step sets.
//!
//! All moduli are `u64`; intermediate products are widened to 128 bits so
//! that no operation wraps. Results that do not fit back into `u64` are
//! reported as [`ArithmeticOverflowError`].

use lockstep_types::ArithmeticOverflowError;

/// Greatest common divisor. `gcd(0, 0) == 0`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple of two non-zero moduli.
pub fn checked_lcm(a: u64, b: u64) -> Result<u64, ArithmeticOverflowError> {
    debug_assert!(a != 0 && b != 0);
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or_else(|| ArithmeticOverflowError::new("lcm", a, b))
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y == g`.
fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_x, mut x) = (1i128, 0i128);
    let (mut old_y, mut y) = (0i128, 1i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_x, x) = (x, old_x - q * x);
        (old_y, y) = (y, old_y - q * y);
    }
    (old_r, old_x, old_y)
}

/// The residue class `{ t : t ≡ residue (mod modulus) }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Congruence {
    residue: u64,
    modulus: u64,
}

impl Congruence {
    /// Create a congruence, reducing `value` into `[0, modulus)`.
    ///
    /// `value` is taken as a 128-bit quantity so that `tail + offset` sums
    /// can be passed without overflowing first.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero.
    pub fn new(value: u128, modulus: u64) -> Self {
        assert!(modulus != 0, "congruence modulus must be non-zero");
        Self {
            residue: (value % modulus as u128) as u64,
            modulus,
        }
    }

    /// The representative in `[0, modulus)`.
    pub fn residue(&self) -> u64 {
        self.residue
    }

    /// The modulus.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Check whether `t` belongs to the class.
    pub fn contains(&self, t: u64) -> bool {
        t % self.modulus == self.residue
    }

    /// Intersect two residue classes (generalized CRT).
    ///
    /// Returns `Ok(None)` when the classes are disjoint, i.e. when the
    /// residues disagree modulo `gcd(m1, m2)`. Otherwise the intersection is
    /// a single class modulo `lcm(m1, m2)`. Fails if that lcm exceeds `u64`.
    pub fn intersect(&self, other: &Congruence) -> Result<Option<Congruence>, ArithmeticOverflowError> {
        let (r1, m1) = (self.residue, self.modulus);
        let (r2, m2) = (other.residue, other.modulus);
        let lcm = checked_lcm(m1, m2)?;
        let g = gcd(m1, m2);

        let diff = r2 as i128 - r1 as i128;
        if diff.rem_euclid(g as i128) != 0 {
            return Ok(None);
        }

        // Solve (m1/g) * k ≡ diff/g (mod m2/g), then t = r1 + m1 * k.
        let n = (m2 / g) as u128;
        let (_, inverse, _) = extended_gcd((m1 / g) as i128, n as i128);
        let inverse = inverse.rem_euclid(n as i128) as u128;
        let quotient = (diff / g as i128).rem_euclid(n as i128) as u128;
        let k = quotient * inverse % n;

        let t = (r1 as u128 + m1 as u128 * k) % lcm as u128;
        Ok(Some(Congruence {
            residue: t as u64,
            modulus: lcm,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERSENNE_31: u64 = (1 << 31) - 1;
    const MERSENNE_61: u64 = (1 << 61) - 1;

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn lcm_basics() {
        assert_eq!(checked_lcm(4, 6), Ok(12));
        assert_eq!(checked_lcm(1, 9), Ok(9));
        assert_eq!(checked_lcm(u64::MAX, u64::MAX), Ok(u64::MAX));
    }

    #[test]
    fn lcm_overflow_of_large_primes() {
        let err = checked_lcm(MERSENNE_61, MERSENNE_31).unwrap_err();
        assert_eq!(err, ArithmeticOverflowError::new("lcm", MERSENNE_61, MERSENNE_31));
    }

    #[test]
    fn extended_gcd_bezout() {
        let (g, x, y) = extended_gcd(240, 46);
        assert_eq!(g, 2);
        assert_eq!(240 * x + 46 * y, 2);
    }

    #[test]
    fn intersect_coprime() {
        // t ≡ 2 (mod 3), t ≡ 3 (mod 5) → t ≡ 8 (mod 15)
        let c = Congruence::new(2, 3).intersect(&Congruence::new(3, 5)).unwrap().unwrap();
        assert_eq!(c, Congruence::new(8, 15));
    }

    #[test]
    fn intersect_shared_factor_compatible() {
        // t ≡ 1 (mod 4), t ≡ 3 (mod 6) → t ≡ 9 (mod 12)
        let c = Congruence::new(1, 4).intersect(&Congruence::new(3, 6)).unwrap().unwrap();
        assert_eq!(c.residue(), 9);
        assert_eq!(c.modulus(), 12);
    }

    #[test]
    fn intersect_shared_factor_incompatible() {
        // t ≡ 0 (mod 4), t ≡ 1 (mod 6): parity disagrees
        let c = Congruence::new(0, 4).intersect(&Congruence::new(1, 6)).unwrap();
        assert_eq!(c, None);
    }

    #[test]
    fn intersect_divisible_moduli() {
        let c = Congruence::new(5, 6).intersect(&Congruence::new(2, 3)).unwrap().unwrap();
        assert_eq!(c, Congruence::new(5, 6));
        let c = Congruence::new(5, 6).intersect(&Congruence::new(1, 3)).unwrap();
        assert_eq!(c, None);
    }

    #[test]
    fn intersect_is_exhaustive_for_small_moduli() {
        for m1 in 1..=12u64 {
            for m2 in 1..=12u64 {
                for r1 in 0..m1 {
                    for r2 in 0..m2 {
                        let a = Congruence::new(r1 as u128, m1);
                        let b = Congruence::new(r2 as u128, m2);
                        let lcm = checked_lcm(m1, m2).unwrap();
                        let expected: Vec<u64> =
                            (0..lcm).filter(|&t| a.contains(t) && b.contains(t)).collect();
                        match a.intersect(&b).unwrap() {
                            Some(c) => assert_eq!(expected, vec![c.residue()]),
                            None => assert!(expected.is_empty()),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn intersect_large_moduli_without_wrapping() {
        let a = Congruence::new(MERSENNE_61 as u128 - 2, MERSENNE_61);
        let b = Congruence::new(1, 1 << 2);
        let c = a.intersect(&b).unwrap().unwrap();
        assert_eq!(c.modulus(), MERSENNE_61 * 4);
        assert!(a.contains(c.residue()));
        assert!(b.contains(c.residue()));
    }

    #[test]
    fn intersect_overflow_is_reported() {
        let a = Congruence::new(0, MERSENNE_61);
        let b = Congruence::new(0, MERSENNE_31);
        assert!(a.intersect(&b).is_err());
    }

    #[test]
    fn new_reduces_wide_values() {
        let c = Congruence::new(u64::MAX as u128 + 10, 7);
        assert_eq!(c.residue(), ((u64::MAX as u128 + 10) % 7) as u64);
    }
}
