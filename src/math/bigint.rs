//! Extended-Euclidean helpers on small integers.

/// Compute a modular inverse using the extended Euclidean algorithm.
///
/// Returns `x` such that `(a * x) % modulus == 1`, or `None` when `a` is not
/// invertible modulo `modulus`.
pub fn mod_inverse(a: i64, modulus: i64) -> Option<i64> {
    let mut t: i64 = 0;
    let mut new_t: i64 = 1;
    let mut r: i64 = modulus;
    let mut new_r: i64 = a.rem_euclid(modulus);

    while new_r != 0 {
        let quotient = r / new_r;
        let tmp_t = t - quotient * new_t;
        t = new_t;
        new_t = tmp_t;

        let tmp_r = r - quotient * new_r;
        r = new_r;
        new_r = tmp_r;
    }

    if r != 1 {
        return None;
    }
    if t < 0 {
        t += modulus;
    }
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_exists() {
        assert_eq!(mod_inverse(3, 2048), Some(683));
        assert_eq!((3 * 683) % 2048, 1);
        let inv9 = mod_inverse(9, 2048).unwrap();
        assert_eq!((9 * inv9) % 2048, 1);
    }

    #[test]
    fn test_inverse_missing() {
        assert_eq!(mod_inverse(2, 2048), None);
        assert_eq!(mod_inverse(0, 7), None);
    }

    #[test]
    fn test_negative_input() {
        let inv = mod_inverse(-3, 2048).unwrap();
        assert_eq!(((-3i64).rem_euclid(2048) * inv) % 2048, 1);
    }
}
