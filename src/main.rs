use anyhow::Context;
use clap::{crate_version, value_parser, Arg, Command};
use log::LevelFilter;
use num_bigint::BigUint;
use std::io::BufRead;
use std::process;
use textbook_rsa::util::config::DEFAULT_PUBLIC_EXPONENT;
use textbook_rsa::{RsaConfig, RsaEngine};

fn cli() -> Command {
    Command::new("textbook-rsa")
        .version(crate_version!())
        .about("encrypt one line from stdin with textbook RSA and decrypt it again")
        .arg(
            Arg::new("bits")
                .long("bits")
                .short('b')
                .help("bit length of each prime")
                .value_parser(value_parser!(u32))
                .default_value("1024"),
        )
        .arg(
            Arg::new("exponent")
                .long("exponent")
                .short('e')
                .help("first candidate for the public exponent")
                .value_parser(value_parser!(u64))
                .default_value(DEFAULT_PUBLIC_EXPONENT.to_string()),
        )
        .arg(
            Arg::new("rounds")
                .long("rounds")
                .short('r')
                .help("Miller-Rabin rounds per prime candidate")
                .value_parser(value_parser!(u32))
                .default_value("50"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("how ciphertext blocks are printed")
                .value_parser(["dec", "hex"])
                .default_value("dec"),
        )
}

fn run() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let defaults = RsaConfig::default();
    let config = RsaConfig::default()
        .with_bit_length(matches.get_one::<u32>("bits").copied().unwrap_or(defaults.bit_length))
        .with_public_exponent(
            matches
                .get_one::<u64>("exponent")
                .copied()
                .unwrap_or(defaults.public_exponent),
        )
        .with_miller_rabin_rounds(
            matches
                .get_one::<u32>("rounds")
                .copied()
                .unwrap_or(defaults.miller_rabin_rounds),
        );
    let as_hex = matches.get_one::<String>("format").map(String::as_str) == Some("hex");

    let engine = RsaEngine::with_config(&config, &mut rand::thread_rng())
        .context("failed to generate RSA key")?;

    println!("Enter a message:");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read message from stdin")?;
    let message = line.trim_end_matches(['\r', '\n']);

    let blocks = engine
        .encrypt(message.as_bytes())
        .context("failed to encrypt message")?;
    println!("Encrypted into {} block(s):", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        if as_hex {
            println!("  [{}] {}", i, hex::encode(block));
        } else {
            println!("  [{}] {}", i, BigUint::from_bytes_be(block));
        }
    }

    let decrypted = engine.decrypt(&blocks).context("failed to decrypt blocks")?;
    println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));

    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
