//! # Textbook RSA for alphabetic messages
//!
//! Letters A-Z are written as two-digit numbers (A=00 ... Z=25), the digit
//! string is cut greedily into blocks below the modulus, and each block is
//! raised to the public exponent. Decryption reverses every step; each
//! block's letter count restores the zero padding lost when digits become
//! integers.
//!
//! This is an educational scheme: no padding, no key size policy, and small
//! deterministic examples are expected.
//!
//! ## Example
//!
//! ```rust
//! use textbook_rsa::rsa::{RsaBigInt, RsaConfig, RsaPrivateKey, RsaPublicKey};
//!
//! let public_key = RsaPublicKey::new(RsaBigInt::from(3233), RsaBigInt::from(17)).unwrap();
//! let ciphertext = public_key.encrypt("HELLO").unwrap();
//!
//! let private_key = RsaPrivateKey::from_factors(
//!     public_key,
//!     RsaBigInt::from(61),
//!     RsaBigInt::from(53),
//!     &RsaConfig::default(),
//!     &mut rand::thread_rng(),
//! )
//! .unwrap();
//! assert_eq!(private_key.d(), &RsaBigInt::from(2753));
//! assert_eq!(private_key.decrypt(&ciphertext).unwrap(), "HELLO");
//! ```

pub mod rsa;
