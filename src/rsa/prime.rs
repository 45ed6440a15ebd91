// Primality Oracle
// Miller-Rabin over an injected random source, plus prime sampling for key generation

use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{Error, Result};

/// Smallest bit size accepted by [`random_prime`]
pub const MIN_PRIME_BITS: u64 = 4;

/// Miller-Rabin primality test
/// Returns true if n is probably prime.
///
/// Each round draws a witness uniformly from [2, n-2] using `rng`, so a
/// composite survives with probability at most 4^(-rounds). Values below 4
/// and even values are answered without consulting `rng`.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    let two = RsaBigInt::from(2u8);
    let three = RsaBigInt::from(3u8);

    if *n < two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^r with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        // upper bound is exclusive: a in [2, n-2]
        let a = rng.gen_bigint_range(&two, &n_minus_one);

        // n > 3 so mod_pow cannot fail here
        let Ok(mut x) = mod_pow(&a, &d, n) else {
            return false;
        };

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..r {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Generate a random prime of exactly `bit_length` bits
pub fn random_prime<R: Rng + ?Sized>(
    bit_length: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<RsaBigInt> {
    if bit_length < MIN_PRIME_BITS {
        return Err(Error::invalid(format!(
            "prime bit length must be at least {MIN_PRIME_BITS}, got {bit_length}"
        )));
    }

    let lower = RsaBigInt::one() << (bit_length - 1);
    let upper = RsaBigInt::one() << bit_length;

    loop {
        let mut candidate = rng.gen_bigint_range(&lower, &upper);

        // Make it odd; upper is even so this stays in range
        if candidate.is_even() {
            candidate += 1u8;
        }

        if is_probable_prime(&candidate, rounds, rng) {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rstest::rstest;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0x5eed)
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(53)]
    #[case(61)]
    #[case(7919)]
    #[case(1_000_000_007)]
    fn test_is_probable_prime_accepts_primes(#[case] n: u64) {
        assert!(is_probable_prime(&RsaBigInt::from(n), 20, &mut rng()));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(9)]
    #[case(100)]
    #[case(3233)]
    #[case(7917)]
    // Carmichael numbers fool Fermat but not Miller-Rabin
    #[case(561)]
    #[case(1105)]
    #[case(41041)]
    fn test_is_probable_prime_rejects_composites(#[case] n: u64) {
        assert!(!is_probable_prime(&RsaBigInt::from(n), 20, &mut rng()));
    }

    #[test]
    fn test_is_probable_prime_negative() {
        assert!(!is_probable_prime(&RsaBigInt::from(-7), 20, &mut rng()));
    }

    #[test]
    fn test_is_probable_prime_matches_trial_division() {
        let mut rng = rng();
        for n in 0u64..2000 {
            let expected = n >= 2 && (2..n).take_while(|k| k * k <= n).all(|k| n % k != 0);
            assert_eq!(
                is_probable_prime(&RsaBigInt::from(n), 20, &mut rng),
                expected,
                "n = {n}"
            );
        }
    }

    #[test]
    fn test_is_probable_prime_is_repeatable_with_seed() {
        let n = RsaBigInt::from(2047u32); // strong pseudoprime to base 2
        let first = is_probable_prime(&n, 3, &mut ChaCha20Rng::seed_from_u64(9));
        let second = is_probable_prime(&n, 3, &mut ChaCha20Rng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_prime_bit_length() {
        let mut rng = rng();
        for bits in [4u64, 8, 16, 32, 64] {
            let p = random_prime(bits, 20, &mut rng).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_probable_prime(&p, 20, &mut rng));
        }
    }

    #[test]
    fn test_random_prime_too_small() {
        assert!(matches!(
            random_prime(3, 20, &mut rng()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
