//! Tests for the legacy transaction pipeline

use chainkit_crypto::{CryptoError, PrivateKey, RecoverableSignature, Secp256k1, SignProvider};
use chainkit_types::TxFields;
use chainkit_wallet::{LegacyTxPipeline, TxStage, WalletError};

const SCENARIO_RAW_KEY1: &str = "0xf850808504a817c80082520880808026a06b62bbdc6d58ab059acde44ed36ffab2c652e51e3b212afb27457beb0d99414ba07afcd6b603b41100d3dc9b3dce3a6734084773f39b13ae8caa8cc8081451b705";

fn scenario_fields() -> TxFields {
    TxFields {
        nonce: "0".into(),
        gas_price: "20000000000".into(),
        gas_limit: "21000".into(),
        to: "".into(),
        value: "0".into(),
        data: "".into(),
        chain_id: "1".into(),
    }
}

fn generator_key() -> PrivateKey {
    PrivateKey::from_hex(&format!("{:064x}", 1)).unwrap()
}

#[test]
fn test_step_by_step_scenario() {
    let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields());
    assert_eq!(pipeline.stage(), &TxStage::Fields);

    let unsigned = pipeline.encode().unwrap();
    assert_eq!(hex::encode(unsigned), "d0808504a817c800825208808080018080");

    let hash = pipeline.hash().unwrap();
    assert_eq!(
        hex::encode(hash),
        "c91030766425230df6537113f725e8ac677163e45d3f58cc215fe5ce0eb368d3"
    );

    let signed = pipeline.sign(Some(&generator_key())).unwrap();
    assert_eq!(signed.raw(), SCENARIO_RAW_KEY1);
    assert_eq!(pipeline.signed().map(|s| s.raw()), Some(SCENARIO_RAW_KEY1.to_string()));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let key = generator_key();
    let first = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields())
        .run(Some(&key))
        .unwrap();
    let second = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields())
        .run(Some(&key))
        .unwrap();
    assert_eq!(first.raw(), second.raw());
}

#[test]
fn test_editing_a_field_invalidates_signature() {
    let key = generator_key();
    let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields());
    let before = pipeline.run(Some(&key)).unwrap();

    pipeline.update_fields(|f| f.nonce = "1".into());
    assert_eq!(pipeline.stage(), &TxStage::Fields);
    assert!(pipeline.signed().is_none());
    assert!(matches!(
        pipeline.sign(Some(&key)),
        Err(WalletError::PreconditionNotMet { .. })
    ));

    let after = pipeline.run(Some(&key)).unwrap();
    assert_ne!(before.raw(), after.raw());
    assert_eq!(after.transaction.nonce, chainkit_types::U256::from(1u64));
}

#[test]
fn test_malformed_fields_are_rejected_before_signing() {
    let key = generator_key();

    let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), TxFields {
        gas_limit: "21k".into(),
        ..scenario_fields()
    });
    assert!(matches!(
        pipeline.run(Some(&key)),
        Err(WalletError::MalformedQuantity { field: "gasLimit", .. })
    ));
    assert_eq!(pipeline.stage(), &TxStage::Fields);

    pipeline.set_fields(TxFields {
        to: "0x35353535".into(),
        ..scenario_fields()
    });
    assert_eq!(
        pipeline.run(Some(&key)),
        Err(WalletError::InvalidLength { expected: 20, actual: 4 })
    );

    pipeline.set_fields(TxFields {
        data: "0xabc".into(),
        ..scenario_fields()
    });
    assert!(matches!(pipeline.run(Some(&key)), Err(WalletError::MalformedHex(_))));
}

#[test]
fn test_missing_private_key() {
    let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields());
    assert_eq!(pipeline.run(None), Err(WalletError::MissingPrivateKey));
    assert_eq!(pipeline.stage(), &TxStage::Fields);
}

/// Signer that returns a fixed signature and records nothing.
struct FixedSigner(RecoverableSignature);

impl SignProvider for FixedSigner {
    fn sign_prehash(&self, _: &[u8; 32], _: &PrivateKey) -> chainkit_crypto::Result<RecoverableSignature> {
        Ok(self.0)
    }
}

#[test]
fn test_custom_signer_and_v_computation() {
    let mut r = [0u8; 32];
    r[31] = 0x07;
    let signer = FixedSigner(RecoverableSignature::new(r, [0x11; 32], 1));
    let mut pipeline = LegacyTxPipeline::new(signer, TxFields {
        chain_id: "137".into(),
        ..scenario_fields()
    });
    let signed = pipeline.run(Some(&generator_key())).unwrap();
    // 1 + 35 + 2 * 137
    assert_eq!(signed.signature.v, chainkit_types::U256::from(310u64));
    // r is an integer: a single byte below 0x80 encodes as itself.
    let raw = signed.raw();
    assert!(raw.contains("820136" /* v = 0x0136 */));
    assert!(raw.contains(&format!("07a0{}", "11".repeat(32))));
}

struct FailingSigner;

impl SignProvider for FailingSigner {
    fn sign_prehash(&self, _: &[u8; 32], _: &PrivateKey) -> chainkit_crypto::Result<RecoverableSignature> {
        Err(CryptoError::Signing("hardware wallet disconnected".into()))
    }
}

#[test]
fn test_signer_failure_keeps_hash() {
    let mut pipeline = LegacyTxPipeline::new(FailingSigner, scenario_fields());
    assert!(matches!(
        pipeline.run(Some(&generator_key())),
        Err(WalletError::ProviderFailure(_))
    ));
    assert_eq!(pipeline.stage().name(), "hashed");
}

#[test]
fn test_invalid_scalar_is_a_provider_failure() {
    let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), scenario_fields());
    let zero = PrivateKey::from_bytes([0u8; 32]);
    assert!(matches!(pipeline.run(Some(&zero)), Err(WalletError::ProviderFailure(_))));
}
