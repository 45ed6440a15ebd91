// RSA Error Types
// Typed failures reported by the arithmetic kernel, key validation and the pipeline

use std::fmt;

use super::bigint::RsaBigInt;

/// Which of the two private factors a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    P,
    Q,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::P => write!(f, "p"),
            Factor::Q => write!(f, "q"),
        }
    }
}

/// `value` has no inverse modulo `modulus` because they share `gcd`.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("no modular inverse: gcd({value}, {modulus}) = {gcd} ≠ 1")]
pub struct NoInverseError {
    pub value: RsaBigInt,
    pub modulus: RsaBigInt,
    pub gcd: RsaBigInt,
}

/// Private key material that does not match the public key.
///
/// Checks run in order (primality, modulus, coprimality) and the first
/// failure is the one reported.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{factor}={value} is not prime (Miller-Rabin)")]
    NotPrime { factor: Factor, value: RsaBigInt },

    #[error("p*q = {p}*{q} = {product} ≠ n = {modulus}")]
    ModulusMismatch {
        p: RsaBigInt,
        q: RsaBigInt,
        product: RsaBigInt,
        modulus: RsaBigInt,
    },

    #[error("gcd(e, φ) = gcd({e}, {phi}) = {gcd} ≠ 1")]
    ExponentNotCoprimeWithPhi {
        e: RsaBigInt,
        phi: RsaBigInt,
        gcd: RsaBigInt,
    },
}

/// Errors that can occur during RSA operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    NoInverse(#[from] NoInverseError),

    #[error("key derivation failed: {0}")]
    KeyDerivation(#[source] NoInverseError),

    #[error("key validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
