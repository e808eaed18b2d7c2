/// Decode `index` into one digit per radix, least significant first.
///
/// With slot lengths `L1..Ln`, digit `k` is `floor(i / (L1*..*L(k-1))) mod Lk`.
/// Indices in `[0, capacity)` map onto distinct digit tuples; past the
/// capacity the sequence repeats with period `capacity`.
///
/// A zero radix yields a zero digit and leaves the place value of the
/// following slots unchanged.
pub fn decode(index: u64, radices: &[usize]) -> Vec<usize> {
    let mut digits = Vec::with_capacity(radices.len());
    let mut divisor: Option<u64> = Some(1);

    for &radix in radices {
        let digit = match (divisor, radix) {
            (_, 0) => 0,
            (Some(d), r) => ((index / d) % r as u64) as usize,
            // Place value exceeds u64, so every remaining digit is zero
            (None, _) => 0,
        };
        digits.push(digit);
        if radix != 0 {
            divisor = divisor.and_then(|d| d.checked_mul(radix as u64));
        }
    }

    digits
}

/// Inverse of [`decode`] for digit tuples inside the radices.
/// Returns `None` when a digit is out of range or the value overflows.
pub fn encode(digits: &[usize], radices: &[usize]) -> Option<u64> {
    if digits.len() != radices.len() {
        return None;
    }

    let mut value: u64 = 0;
    let mut place: u64 = 1;
    for (&digit, &radix) in digits.iter().zip(radices) {
        if digit >= radix {
            return None;
        }
        value = value.checked_add((digit as u64).checked_mul(place)?)?;
        place = place.checked_mul(radix as u64).unwrap_or(u64::MAX);
    }
    Some(value)
}

/// Number of distinct tuples, or `None` if it does not fit in a u64
pub fn capacity(radices: &[usize]) -> Option<u64> {
    radices
        .iter()
        .try_fold(1u64, |acc, &r| acc.checked_mul(r as u64))
}

/// Split an index into `(variant, within_variant)` so that consecutive
/// indices rotate through variants before advancing inside one.
pub fn split_variant(index: u64, variant_count: usize) -> (usize, u64) {
    if variant_count == 0 {
        return (0, index);
    }
    let count = variant_count as u64;
    ((index % count) as usize, index / count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::HashSet;

    #[test]
    fn decode_follows_positional_rule() {
        let radices = [50, 50, 50, 50];
        assert_eq!(decode(0, &radices), vec![0, 0, 0, 0]);
        assert_eq!(decode(1, &radices), vec![1, 0, 0, 0]);
        assert_eq!(decode(50, &radices), vec![0, 1, 0, 0]);
        assert_eq!(decode(2_551, &radices), vec![1, 1, 1, 0]);
    }

    #[test]
    fn full_range_visits_every_tuple_once() {
        let radices = [3, 4, 5];
        let cap = capacity(&radices).unwrap();
        assert_eq!(cap, 60);

        let seen: HashSet<Vec<usize>> = (0..cap).map(|i| decode(i, &radices)).collect();
        assert_eq!(seen.len() as u64, cap);

        let all: HashSet<Vec<usize>> = (0..3)
            .cartesian_product(0..4)
            .cartesian_product(0..5)
            .map(|((a, b), c)| vec![a, b, c])
            .collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn sequence_repeats_after_capacity() {
        let radices = [10, 10, 10];
        assert_eq!(decode(1_000, &radices), decode(0, &radices));
        assert_eq!(decode(1_234, &radices), decode(234, &radices));
    }

    #[test]
    fn encode_inverts_decode() {
        let radices = [5, 7, 2];
        for i in [0u64, 1, 13, 34, 69] {
            assert_eq!(encode(&decode(i, &radices), &radices), Some(i));
        }
        assert_eq!(encode(&[5, 0, 0], &radices), None);
        assert_eq!(encode(&[1, 0], &radices), None);
    }

    #[test]
    fn capacity_reports_overflow() {
        assert_eq!(capacity(&[]), Some(1));
        assert_eq!(capacity(&[50; 5]), Some(312_500_000));
        assert_eq!(capacity(&[usize::MAX, usize::MAX]), None);
    }

    #[test]
    fn decode_tolerates_huge_place_values() {
        let radices = [usize::MAX, usize::MAX, 7];
        let digits = decode(u64::MAX, &radices);
        assert_eq!(digits.len(), 3);
        assert_eq!(digits[2], 0);
    }

    #[test]
    fn zero_radix_is_skipped() {
        assert_eq!(decode(5, &[0, 3]), vec![0, 2]);
        assert_eq!(decode(7, &[2, 0, 3]), vec![1, 0, 0]);
        assert_eq!(decode(u64::MAX, &[0, 0]), vec![0, 0]);
    }

    #[test]
    fn split_variant_rotates_first() {
        assert_eq!(split_variant(0, 5), (0, 0));
        assert_eq!(split_variant(6, 5), (1, 1));
        assert_eq!(split_variant(14, 5), (4, 2));
        assert_eq!(split_variant(9, 0), (0, 9));
    }
}
