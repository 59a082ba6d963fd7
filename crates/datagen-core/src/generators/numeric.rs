//! Numeric value generators.

use rand::Rng;

/// Generate a random integer in `[lower, upper)`.
///
/// The range must be non-empty; directive parsing guarantees `lower < upper`.
pub fn generate_int_range<R: Rng>(rng: &mut R, lower: i64, upper: i64) -> i64 {
    rng.random_range(lower..upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range_half_open() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_lower = false;

        for _ in 0..1000 {
            let value = generate_int_range(&mut rng, 10, 13);
            assert!((10..13).contains(&value));
            saw_lower |= value == 10;
        }

        assert!(saw_lower);
    }

    #[test]
    fn test_generate_int_range_single_value() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(generate_int_range(&mut rng, -3, -2), -3);
        }
    }
}
