// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod blocks;
pub mod codec;
pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod prime;

pub use bigint::{extended_gcd, gcd, mod_pow, modular_inverse, RsaBigInt};
pub use blocks::{pack, unpack, Block, CipherBlock};
pub use codec::{clean_text, decode, encode};
pub use config::RsaConfig;
pub use decrypt::{decrypt, decrypt_blocks, decrypt_with_config};
pub use encrypt::{encrypt, encrypt_blocks, encrypt_with_config};
pub use error::{Error, Factor, NoInverseError, Result, ValidationError};
pub use keygen::{
    derive_private_exponent, generate_keypair, validate_keys, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
pub use prime::{is_probable_prime, random_prime};
