//! Tests for commands/hash.rs

use chainkit_cli::commands::hash::{Algorithm, HashArgs, HashCommands};
use chainkit_cli::CliError;

fn args(input: &str, hex: bool) -> HashArgs {
    HashArgs {
        input: input.to_string(),
        hex,
    }
}

#[test]
fn test_text_and_hex_input() {
    assert_eq!(args("abc", false).bytes().unwrap(), b"abc");
    assert_eq!(args("0x616263", true).bytes().unwrap(), b"abc");
    assert_eq!(args("", true).bytes().unwrap(), Vec::<u8>::new());
}

#[test]
fn test_malformed_hex_input() {
    assert!(matches!(
        args("0x123", true).bytes(),
        Err(CliError::Encoding(chainkit_types::Error::MalformedHex(_)))
    ));
}

#[test]
fn test_digests_of_abc() {
    let cases = [
        (Algorithm::Ripemd160, "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"),
        (
            Algorithm::Sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        (
            Algorithm::Keccak256,
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45",
        ),
        (Algorithm::Hash160, "bb1be98c142444d7a56aa3981c3942a978e4dc33"),
    ];
    for (algorithm, expected) in cases {
        assert_eq!(hex::encode(algorithm.digest(b"abc")), expected, "{}", algorithm.name());
    }
}

#[test]
fn test_into_parts() {
    let (algorithm, input) = HashCommands::Keccak256(args("x", false)).into_parts();
    assert_eq!(algorithm, Algorithm::Keccak256);
    assert_eq!(input.input, "x");
}
