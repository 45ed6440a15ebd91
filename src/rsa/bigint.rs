// RSA Big Integer Operations
// Exact modular arithmetic on num-bigint: extended Euclid, inverses, square-and-multiply

use log::trace;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::error::{Error, NoInverseError, Result};

/// RSA Big Integer type alias
///
/// Signed so that Bézout coefficients and caller supplied values can be
/// represented exactly; the kernel rejects negatives where they make no sense.
pub type RsaBigInt = BigInt;

/// Greatest common divisor, always non-negative
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Extended Euclidean Algorithm
/// Returns (g, x, y) such that a*x + b*y = g = gcd(a, b), with g >= 0.
///
/// Quotients are floored, and a zero `b` yields `(|a|, sign(a), 0)` (with
/// sign(0) = 1). The loop keeps the Bézout coefficients of the last two
/// remainders, so its output matches the textbook recursive formulation
/// without growing the call stack.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, RsaBigInt, RsaBigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (RsaBigInt::one(), RsaBigInt::zero());
    let (mut old_y, mut y) = (RsaBigInt::zero(), RsaBigInt::one());

    while !r.is_zero() {
        let (quotient, remainder) = old_r.div_mod_floor(&r);
        old_r = std::mem::replace(&mut r, remainder);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    if old_r.is_negative() {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// Compute modular inverse: a^(-1) mod m
/// Returns x in [0, m) with (a * x) mod m = 1.
///
/// Fails with [`Error::NoInverse`] when gcd(a, m) ≠ 1 and with
/// [`Error::InvalidArgument`] when m ≤ 1.
pub fn modular_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Result<RsaBigInt> {
    if *m <= RsaBigInt::one() {
        return Err(Error::invalid(format!(
            "modulus for an inverse must be greater than 1, got {m}"
        )));
    }

    let (g, x, _) = extended_gcd(a, m);
    if !g.is_one() {
        return Err(NoInverseError {
            value: a.clone(),
            modulus: m.clone(),
            gcd: g,
        }
        .into());
    }

    Ok(x.mod_floor(m))
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply, reducing after every product so intermediates
/// stay below modulus².
///
/// An exponent of zero yields 1 for any base. The modulus must be at least 1
/// and the exponent non-negative.
pub fn mod_pow(base: &RsaBigInt, exponent: &RsaBigInt, modulus: &RsaBigInt) -> Result<RsaBigInt> {
    if *modulus < RsaBigInt::one() {
        return Err(Error::invalid(format!("modulus must be at least 1, got {modulus}")));
    }
    if exponent.is_negative() {
        return Err(Error::invalid(format!("negative exponent {exponent}")));
    }

    let mut result = RsaBigInt::one();
    let mut base = base.mod_floor(modulus);
    let mut exp = exponent.clone();
    let mut step = 0u64;

    while !exp.is_zero() {
        step += 1;
        if exp.is_odd() {
            result = (&result * &base) % modulus;
            trace!("step {step}: bit 1, result = {result} (mod {modulus})");
        } else {
            trace!("step {step}: bit 0, square only");
        }

        exp >>= 1;
        // the last square would be discarded
        if !exp.is_zero() {
            base = (&base * &base) % modulus;
            trace!("step {step}: base = {base} (mod {modulus})");
        }
    }

    Ok(result)
}
