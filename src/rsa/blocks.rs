// Block Packer / Unpacker
// Greedy partition of a digit string into integers below the modulus, and its exact inverse

use std::ops::Deref;

use log::trace;
use num_traits::{Signed, Zero};

use super::bigint::RsaBigInt;
use super::codec::DIGITS_PER_LETTER;
use super::error::{Error, Result};

/// Smallest modulus that can hold a single letter (Z = 25)
pub const MIN_MODULUS: u32 = 26;

/// Largest letter count whose digit width still fits in a `usize`
pub const MAX_LETTER_COUNT: usize = usize::MAX / DIGITS_PER_LETTER;

fn check_parts(value: &RsaBigInt, letter_count: usize) -> Result<()> {
    if value.is_negative() {
        return Err(Error::invalid(format!("block value must be non-negative, got {value}")));
    }
    if letter_count == 0 {
        return Err(Error::invalid("block must hold at least one letter"));
    }
    if letter_count > MAX_LETTER_COUNT {
        return Err(Error::invalid(format!(
            "block letter count {letter_count} exceeds {MAX_LETTER_COUNT}"
        )));
    }
    Ok(())
}

fn padded_digits(value: &RsaBigInt, letter_count: usize) -> String {
    let width = letter_count * DIGITS_PER_LETTER;
    format!("{:0>width$}", value.to_string())
}

/// A plaintext block: a run of whole letters read as one integer.
///
/// `letter_count` fixes how many zero-padded digits the value stands for,
/// so leading `A`s (00) survive the trip through an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    value: RsaBigInt,
    letter_count: usize,
}

impl Block {
    pub fn new(value: RsaBigInt, letter_count: usize) -> Result<Self> {
        check_parts(&value, letter_count)?;
        Ok(Self {
            value,
            letter_count,
        })
    }

    pub(crate) fn from_parts(value: RsaBigInt, letter_count: usize) -> Self {
        Self {
            value,
            letter_count,
        }
    }

    #[inline]
    pub fn value(&self) -> &RsaBigInt {
        &self.value
    }

    #[inline]
    pub fn letter_count(&self) -> usize {
        self.letter_count
    }

    /// Decimal digits of the value, left padded to two per letter
    pub fn digits(&self) -> String {
        padded_digits(&self.value, self.letter_count)
    }
}

/// An encrypted block. Carries the letter count of the block it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherBlock {
    value: RsaBigInt,
    letter_count: usize,
}

impl CipherBlock {
    pub fn new(value: RsaBigInt, letter_count: usize) -> Result<Self> {
        check_parts(&value, letter_count)?;
        Ok(Self {
            value,
            letter_count,
        })
    }

    pub(crate) fn from_parts(value: RsaBigInt, letter_count: usize) -> Self {
        Self {
            value,
            letter_count,
        }
    }

    #[inline]
    pub fn value(&self) -> &RsaBigInt {
        &self.value
    }

    #[inline]
    pub fn letter_count(&self) -> usize {
        self.letter_count
    }
}

impl Deref for CipherBlock {
    type Target = RsaBigInt;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

/// Split a digit string into blocks whose values are below `modulus`.
///
/// Scans left to right, appending two-digit groups to the current block
/// while the result stays below the modulus, and starts a new block when it
/// would not. Every block therefore covers whole letters and holds as many of
/// them as fit.
///
/// Fails with [`Error::InvalidArgument`] when the modulus cannot hold a
/// single letter (≤ 25), when `digits` has odd length or non-digit
/// characters, or when a lone group does not fit the modulus.
pub fn pack(digits: &str, modulus: &RsaBigInt) -> Result<Vec<Block>> {
    if *modulus < RsaBigInt::from(MIN_MODULUS) {
        return Err(Error::invalid(format!(
            "modulus too small: {modulus} cannot hold a letter (needs > 25)"
        )));
    }
    if digits.len() % DIGITS_PER_LETTER != 0 {
        return Err(Error::invalid(format!(
            "digit string must have even length, got {}",
            digits.len()
        )));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(Error::invalid(format!("digit string contains {bad:?}")));
    }

    let mut blocks = Vec::new();
    let mut value = RsaBigInt::zero();
    let mut letter_count = 0usize;

    for pair in digits.as_bytes().chunks_exact(DIGITS_PER_LETTER) {
        let group = u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0');

        let candidate = &value * 100u32 + group;
        if candidate < *modulus {
            value = candidate;
            letter_count += 1;
            continue;
        }

        if RsaBigInt::from(group) >= *modulus {
            return Err(Error::invalid(format!(
                "group {group:02} does not fit modulus {modulus}"
            )));
        }

        trace!("block {}: {value} ({letter_count} letters)", blocks.len() + 1);
        blocks.push(Block::from_parts(value, letter_count));

        value = RsaBigInt::from(group);
        letter_count = 1;
    }

    if letter_count > 0 {
        trace!("block {}: {value} ({letter_count} letters)", blocks.len() + 1);
        blocks.push(Block::from_parts(value, letter_count));
    }

    Ok(blocks)
}

/// Rebuild the digit string from blocks, zero padding each value to two
/// digits per letter.
pub fn unpack(blocks: &[Block]) -> String {
    blocks.iter().map(Block::digits).collect()
}

/// Apply `f` to every block, keeping input order in the output.
#[cfg(feature = "parallel")]
pub(crate) fn map_blocks<T, U, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<U> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Apply `f` to every block, keeping input order in the output.
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_blocks<T, U, F>(items: &[T], _parallel: bool, f: F) -> Result<Vec<U>>
where
    F: Fn(&T) -> Result<U>,
{
    items.iter().map(f).collect()
}
