// RSA Decryption Implementation
// C^d mod n per block -> zero padded digit string -> text

use log::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::blocks::{map_blocks, unpack, Block, CipherBlock};
use super::codec::decode;
use super::config::RsaConfig;
use super::error::{Error, Result};

/// Decrypt cipher blocks with the private exponent d and modulus n
/// Returns the recovered uppercase text.
pub fn decrypt(blocks: &[CipherBlock], d: &RsaBigInt, n: &RsaBigInt) -> Result<String> {
    decrypt_with_config(blocks, d, n, &RsaConfig::default())
}

/// Same as [`decrypt`] with an explicit configuration
pub fn decrypt_with_config(
    blocks: &[CipherBlock],
    d: &RsaBigInt,
    n: &RsaBigInt,
    config: &RsaConfig,
) -> Result<String> {
    let plain = decrypt_blocks(blocks, d, n, config)?;

    let digits = unpack(&plain);
    debug!("reconstructed {} digits from {} blocks", digits.len(), plain.len());

    Ok(decode(&digits))
}

/// Compute M = C^d mod n for each block, preserving letter counts.
///
/// A cipher value at or above n cannot have come from this modulus and is
/// rejected.
pub fn decrypt_blocks(
    blocks: &[CipherBlock],
    d: &RsaBigInt,
    n: &RsaBigInt,
    config: &RsaConfig,
) -> Result<Vec<Block>> {
    map_blocks(blocks, config.fan_out(blocks.len()), |block| {
        if block.value() >= n {
            return Err(Error::invalid(format!(
                "cipher block {} is not below modulus {n}",
                block.value()
            )));
        }
        let m = mod_pow(block.value(), d, n)?;
        Ok(Block::from_parts(m, block.letter_count()))
    })
}
