// RSA Encryption Implementation
// text -> digit string -> blocks below n -> M^e mod n per block

use log::{debug, warn};

use super::bigint::{mod_pow, RsaBigInt};
use super::blocks::{map_blocks, pack, Block, CipherBlock};
use super::codec::{encode, DIGITS_PER_LETTER};
use super::config::RsaConfig;
use super::error::Result;

/// Encrypt text with the public key (e, n)
/// Returns one cipher block per packed plaintext block, in message order.
///
/// Characters outside A-Z are dropped before encryption.
pub fn encrypt(plaintext: &str, e: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<CipherBlock>> {
    encrypt_with_config(plaintext, e, n, &RsaConfig::default())
}

/// Same as [`encrypt`] with an explicit configuration
pub fn encrypt_with_config(
    plaintext: &str,
    e: &RsaBigInt,
    n: &RsaBigInt,
    config: &RsaConfig,
) -> Result<Vec<CipherBlock>> {
    let digits = encode(plaintext);
    let letters = digits.len() / DIGITS_PER_LETTER;

    let dropped = plaintext.chars().count() - letters;
    if dropped > 0 {
        warn!("dropped {dropped} characters outside A-Z");
    }

    let blocks = pack(&digits, n)?;
    debug!("packed {letters} letters into {} blocks below {n}", blocks.len());

    encrypt_blocks(&blocks, e, n, config)
}

/// Compute C = M^e mod n for each block, preserving letter counts
pub fn encrypt_blocks(
    blocks: &[Block],
    e: &RsaBigInt,
    n: &RsaBigInt,
    config: &RsaConfig,
) -> Result<Vec<CipherBlock>> {
    map_blocks(blocks, config.fan_out(blocks.len()), |block| {
        let c = mod_pow(block.value(), e, n)?;
        Ok(CipherBlock::from_parts(c, block.letter_count()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::error::Error;

    fn int(n: i64) -> RsaBigInt {
        RsaBigInt::from(n)
    }

    fn parts(blocks: &[CipherBlock]) -> Vec<(RsaBigInt, usize)> {
        blocks
            .iter()
            .map(|block| (block.value().clone(), block.letter_count()))
            .collect()
    }

    #[test]
    fn test_encrypt_hello() {
        let ciphertext = encrypt("HELLO", &int(17), &int(3233)).unwrap();
        assert_eq!(
            parts(&ciphertext),
            vec![(int(328), 2), (int(474), 2), (int(2549), 1)]
        );
    }

    #[test]
    fn test_encrypt_single_letter() {
        let ciphertext = encrypt("A", &int(17), &int(3233)).unwrap();
        assert_eq!(parts(&ciphertext), vec![(int(0), 1)]);
    }

    #[test]
    fn test_encrypt_drops_non_letters() {
        assert_eq!(
            encrypt("h-e-l-l-o!", &int(17), &int(3233)).unwrap(),
            encrypt("HELLO", &int(17), &int(3233)).unwrap()
        );
    }

    #[test]
    fn test_encrypt_empty() {
        assert!(encrypt("", &int(17), &int(3233)).unwrap().is_empty());
        assert!(encrypt("42", &int(17), &int(3233)).unwrap().is_empty());
    }

    #[test]
    fn test_encrypt_modulus_too_small() {
        assert!(matches!(
            encrypt("HELLO", &int(3), &int(25)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encrypt_negative_exponent() {
        assert!(matches!(
            encrypt("HELLO", &int(-17), &int(3233)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encrypt_fan_out_preserves_order() {
        let text = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
        let sequential = RsaConfig::default().with_parallel_threshold(usize::MAX);
        let parallel = RsaConfig::default().with_parallel_threshold(1);

        let a = encrypt_with_config(text, &int(17), &int(3233), &sequential).unwrap();
        let b = encrypt_with_config(text, &int(17), &int(3233), &parallel).unwrap();
        assert_eq!(a, b);
        assert!(a.len() > 10);
    }
}
