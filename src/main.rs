use anyhow::Error;
use clap::Parser;
use log::info;
use textbook_rsa::rsa::{
    clean_text, encode, pack, RsaBigInt, RsaConfig, RsaPrivateKey, RsaPublicKey,
};

/// Encrypt a message with textbook RSA and recover it from the private factors
#[derive(Parser, Debug)]
#[clap()]
struct Args {
    /// First prime factor
    #[clap(short, long, default_value = "61")]
    p: RsaBigInt,
    /// Second prime factor
    #[clap(short, long, default_value = "53")]
    q: RsaBigInt,
    /// Public exponent
    #[clap(short, long, default_value = "17")]
    e: RsaBigInt,
    /// Miller-Rabin rounds for validating p and q
    #[clap(long, default_value = "20")]
    rounds: u32,
    /// Message, letters A-Z only (others are dropped)
    #[clap(default_value = "HELLO")]
    message: String,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Args { p, q, e, rounds, message } = Args::parse();

    let (cleaned, modified) = clean_text(&message);
    if modified {
        info!("message cleaned to {cleaned}");
    }

    let n = &p * &q;
    let public_key = RsaPublicKey::new(n.clone(), e.clone())?;
    info!("public key: n = {n}, e = {e}");

    let digits = encode(&cleaned);
    println!("digits:     {digits}");
    let blocks = pack(&digits, &n)?;
    let plain: Vec<_> = blocks
        .iter()
        .map(|b| format!("{}({})", b.value(), b.letter_count()))
        .collect();
    println!("blocks:     {}", plain.join(" "));

    let ciphertext = public_key.encrypt(&cleaned)?;
    let cipher: Vec<_> = ciphertext.iter().map(|b| b.value().to_string()).collect();
    println!("ciphertext: {}", cipher.join(" "));

    let config = RsaConfig::default().with_primality_rounds(rounds);
    let private_key =
        RsaPrivateKey::from_factors(public_key, p, q, &config, &mut rand::thread_rng())?;
    info!("φ(n) = {}, d = {}", private_key.phi(), private_key.d());

    let recovered = private_key.decrypt(&ciphertext)?;
    println!("recovered:  {recovered}");

    if recovered != cleaned {
        anyhow::bail!("recovered message {recovered} does not match {cleaned}");
    }

    Ok(())
}
