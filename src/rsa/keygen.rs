// RSA Key Validation and Derivation
// Checks private factors against a public key, derives d, and generates small key pairs

use log::debug;
use num_traits::One;
use rand::Rng;

use super::bigint::{gcd, modular_inverse, RsaBigInt};
use super::blocks::{CipherBlock, MIN_MODULUS};
use super::config::RsaConfig;
use super::error::{Error, Factor, Result, ValidationError};
use super::prime::{is_probable_prime, random_prime};

/// Check that p and q are a valid factorisation of n for exponent e.
///
/// In order: both factors pass Miller-Rabin, p*q = n, and gcd(e, φ) = 1.
/// Returns φ(n) = (p-1)(q-1) on success, otherwise the first failed check.
pub fn validate_keys<R: Rng + ?Sized>(
    p: &RsaBigInt,
    q: &RsaBigInt,
    n: &RsaBigInt,
    e: &RsaBigInt,
    rounds: u32,
    rng: &mut R,
) -> std::result::Result<RsaBigInt, ValidationError> {
    for (factor, value) in [(Factor::P, p), (Factor::Q, q)] {
        if !is_probable_prime(value, rounds, rng) {
            return Err(ValidationError::NotPrime {
                factor,
                value: value.clone(),
            });
        }
    }

    let product = p * q;
    if product != *n {
        return Err(ValidationError::ModulusMismatch {
            p: p.clone(),
            q: q.clone(),
            product,
            modulus: n.clone(),
        });
    }

    let phi = (p - 1u8) * (q - 1u8);
    let common = gcd(e, &phi);
    if !common.is_one() {
        return Err(ValidationError::ExponentNotCoprimeWithPhi {
            e: e.clone(),
            phi,
            gcd: common,
        });
    }

    Ok(phi)
}

/// Compute d = e^(-1) mod φ.
///
/// A missing inverse is reported as [`Error::KeyDerivation`].
pub fn derive_private_exponent(e: &RsaBigInt, phi: &RsaBigInt) -> Result<RsaBigInt> {
    modular_inverse(e, phi).map_err(|err| match err {
        Error::NoInverse(inner) => Error::KeyDerivation(inner),
        other => other,
    })
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: RsaBigInt,
    e: RsaBigInt,
}

impl RsaPublicKey {
    /// The modulus must hold at least one letter (n > 25) and e must exceed 1.
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        if n < RsaBigInt::from(MIN_MODULUS) {
            return Err(Error::invalid(format!("modulus too small: {n} (needs > 25)")));
        }
        if e <= RsaBigInt::one() {
            return Err(Error::invalid(format!("public exponent must be > 1, got {e}")));
        }
        Ok(Self { n, e })
    }

    #[inline]
    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    #[inline]
    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<CipherBlock>> {
        super::encrypt::encrypt(plaintext, &self.e, &self.n)
    }
}

/// RSA Private Key, only constructed from validated factors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    public_key: RsaPublicKey,
    p: RsaBigInt,
    q: RsaBigInt,
    phi: RsaBigInt,
    d: RsaBigInt,
}

impl RsaPrivateKey {
    /// Validate p and q against `public_key` and derive the private exponent.
    pub fn from_factors<R: Rng + ?Sized>(
        public_key: RsaPublicKey,
        p: RsaBigInt,
        q: RsaBigInt,
        config: &RsaConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let phi = validate_keys(
            &p,
            &q,
            &public_key.n,
            &public_key.e,
            config.primality_rounds,
            rng,
        )?;
        debug!("keys valid: p={p}, q={q}, φ={phi}");

        let d = derive_private_exponent(&public_key.e, &phi)?;
        debug!("derived d={d}");

        Ok(Self {
            public_key,
            p,
            q,
            phi,
            d,
        })
    }

    #[inline]
    pub fn pub_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    #[inline]
    pub fn p(&self) -> &RsaBigInt {
        &self.p
    }

    #[inline]
    pub fn q(&self) -> &RsaBigInt {
        &self.q
    }

    #[inline]
    pub fn phi(&self) -> &RsaBigInt {
        &self.phi
    }

    #[inline]
    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    /// Decrypt cipher blocks back to text
    pub fn decrypt(&self, blocks: &[CipherBlock]) -> Result<String> {
        super::decrypt::decrypt(blocks, &self.d, &self.public_key.n)
    }
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

/// Generate a key pair from two distinct random primes of `prime_bits` bits each.
///
/// Fails with [`Error::KeyGeneration`] when e is not coprime with the
/// resulting φ; pick another exponent or try again.
pub fn generate_keypair<R: Rng + ?Sized>(
    prime_bits: u64,
    e: &RsaBigInt,
    config: &RsaConfig,
    rng: &mut R,
) -> Result<RsaKeyPair> {
    let rounds = config.primality_rounds;

    let p = random_prime(prime_bits, rounds, rng)?;
    let q = loop {
        let q = random_prime(prime_bits, rounds, rng)?;
        if q != p {
            break q;
        }
    };

    let phi = (&p - 1u8) * (&q - 1u8);
    if !gcd(e, &phi).is_one() {
        return Err(Error::KeyGeneration(format!("e={e} is not coprime with φ(n)={phi}")));
    }

    let public_key = RsaPublicKey::new(&p * &q, e.clone())?;
    let private_key = RsaPrivateKey::from_factors(public_key.clone(), p, q, config, rng)?;

    Ok(RsaKeyPair {
        public_key,
        private_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn int(n: i64) -> RsaBigInt {
        RsaBigInt::from(n)
    }

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn test_validate_keys_classic() {
        let phi = validate_keys(&int(61), &int(53), &int(3233), &int(17), 20, &mut rng()).unwrap();
        assert_eq!(phi, int(3120));
    }

    #[test]
    fn test_validate_keys_not_prime() {
        let err = validate_keys(&int(60), &int(51), &int(3060), &int(17), 20, &mut rng())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPrime {
                factor: Factor::P,
                value: int(60),
            }
        );

        let err = validate_keys(&int(61), &int(51), &int(3111), &int(17), 20, &mut rng())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPrime {
                factor: Factor::Q,
                value: int(51),
            }
        );
    }

    #[test]
    fn test_validate_keys_modulus_mismatch() {
        let err = validate_keys(&int(61), &int(53), &int(3234), &int(17), 20, &mut rng())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ModulusMismatch {
                p: int(61),
                q: int(53),
                product: int(3233),
                modulus: int(3234),
            }
        );
    }

    #[test]
    fn test_validate_keys_exponent_not_coprime() {
        let err = validate_keys(&int(61), &int(53), &int(3233), &int(3), 20, &mut rng())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ExponentNotCoprimeWithPhi {
                e: int(3),
                phi: int(3120),
                gcd: int(3),
            }
        );
    }

    #[test]
    fn test_derive_private_exponent() {
        let d = derive_private_exponent(&int(17), &int(3120)).unwrap();
        assert_eq!(d, int(2753));
        assert_eq!((int(17) * d) % int(3120), int(1));
    }

    #[test]
    fn test_derive_private_exponent_no_inverse() {
        let err = derive_private_exponent(&int(2), &int(26)).unwrap_err();
        assert!(matches!(err, Error::KeyDerivation(ref inner) if inner.gcd == int(2)));
    }

    #[test]
    fn test_public_key_bounds() {
        assert!(RsaPublicKey::new(int(3233), int(17)).is_ok());
        assert!(matches!(RsaPublicKey::new(int(25), int(17)), Err(Error::InvalidArgument(_))));
        assert!(matches!(RsaPublicKey::new(int(3233), int(1)), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_private_key_from_factors() {
        let public_key = RsaPublicKey::new(int(3233), int(17)).unwrap();
        let config = RsaConfig::default();
        let key = RsaPrivateKey::from_factors(public_key, int(61), int(53), &config, &mut rng())
            .unwrap();
        assert_eq!(key.d(), &int(2753));
        assert_eq!(key.phi(), &int(3120));
        assert_eq!(key.pub_key().n(), &int(3233));
    }

    #[test]
    fn test_private_key_from_bad_factors() {
        let public_key = RsaPublicKey::new(int(3233), int(17)).unwrap();
        let config = RsaConfig::default();
        let err = RsaPrivateKey::from_factors(public_key, int(61), int(59), &config, &mut rng())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::ModulusMismatch { .. })));
    }

    #[test]
    fn test_key_properties() {
        let mut rng = rng();
        let e = int(65537);
        for bits in [4u64, 8, 12, 16] {
            let keypair = generate_keypair(bits, &e, &RsaConfig::default(), &mut rng).unwrap();
            let key = &keypair.private_key;

            // Verify n = p * q
            assert_eq!(keypair.public_key.n(), &(key.p() * key.q()));
            assert_ne!(key.p(), key.q());

            // Verify e * d ≡ 1 (mod φ(n))
            assert_eq!((&e * key.d()) % key.phi(), int(1));
        }
    }

    #[test]
    fn test_generate_keypair_exponent_not_coprime() {
        // φ of two odd primes is even
        let err = generate_keypair(8, &int(2), &RsaConfig::default(), &mut rng()).unwrap_err();
        assert!(matches!(err, Error::KeyGeneration(_)));
    }
}
