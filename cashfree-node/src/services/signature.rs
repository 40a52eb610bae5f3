//! Payout request signing.
//!
//! The authorize endpoint expects `X-Cf-Signature` to be the base64 of
//! `RSA-OAEP(client_id + "." + epoch_seconds)` under the public key Cashfree
//! issued for the account. The server decrypts with OAEP using SHA-1 for both
//! the digest and MGF1, so nothing else interoperates.

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use rsa::{pkcs8::DecodePublicKey, Oaep, RsaPublicKey};
use sha1::Sha1;

use crate::error::ConnectorError;

const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_END: &str = "-----END PUBLIC KEY-----";

/// Build the signing subject `<client_id>.<unix-epoch-seconds>`.
///
/// The clock is read on every call; the endpoint rejects stale timestamps.
pub fn build_signing_subject(client_id: &str) -> String {
    format!("{}.{}", client_id, Utc::now().timestamp())
}

/// Encrypt `subject` under the PEM public key and return it base64-encoded.
pub fn sign_subject(subject: &str, public_key_pem: &str) -> Result<String, ConnectorError> {
    let public_key = parse_public_key(public_key_pem)?;

    let mut rng = rand::thread_rng();
    let ciphertext = public_key
        .encrypt(&mut rng, Oaep::new::<Sha1>(), subject.as_bytes())
        .map_err(|e| ConnectorError::Signature(format!("RSA-OAEP encryption failed: {}", e)))?;

    Ok(general_purpose::STANDARD.encode(ciphertext))
}

/// Parse PEM-like key material as an X.509 SubjectPublicKeyInfo RSA key.
pub fn parse_public_key(public_key_pem: &str) -> Result<RsaPublicKey, ConnectorError> {
    let der = general_purpose::STANDARD
        .decode(strip_pem(public_key_pem))
        .map_err(|e| ConnectorError::Signature(format!("Public key is not valid base64: {}", e)))?;

    RsaPublicKey::from_public_key_der(&der).map_err(|e| {
        ConnectorError::Signature(format!(
            "Public key is not an RSA SubjectPublicKeyInfo: {}",
            e
        ))
    })
}

/// Drop the PEM delimiter lines and every whitespace character.
fn strip_pem(public_key_pem: &str) -> String {
    public_key_pem
        .replace(PEM_BEGIN, "")
        .replace(PEM_END, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
