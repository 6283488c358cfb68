// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password encryption under the server-issued RSA key.
//!
//! The server hands out a bare base64 SubjectPublicKeyInfo. It is wrapped in
//! PEM armour, decoded, checked to be RSA, and used to encrypt the password
//! with PKCS#1 v1.5 padding. Padding is randomised, so two encryptions of the
//! same password never match.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs8::der::Decode;
use rsa::pkcs8::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use ssctl_common_secret::SecretString;

use crate::error::AuthError;
use crate::public_key::PublicKeyMaterial;

/// rsaEncryption (PKCS #1).
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Bytes of PKCS#1 v1.5 padding overhead per block.
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Base64 of the RSA ciphertext, ready for the `password` field.
#[derive(Debug, Clone)]
pub struct EncryptedCredential(SecretString);

impl EncryptedCredential {
	pub fn expose(&self) -> &str {
		self.0.expose()
	}

	#[cfg(test)]
	pub(crate) fn for_tests(ciphertext_b64: &str) -> Self {
		Self(SecretString::from(ciphertext_b64))
	}
}

/// Re-armour the bare key the way the server's own web client does.
pub fn wrap_pem(material: &PublicKeyMaterial) -> String {
	format!(
		"-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
		material.as_str()
	)
}

/// Decode key material into an RSA public key.
///
/// Fails with [`AuthError::KeyDecodeFailed`] if the text is not PEM/DER and
/// with [`AuthError::KeyTypeMismatch`] if it is a well-formed key of some
/// other algorithm.
pub fn decode_public_key(material: &PublicKeyMaterial) -> Result<RsaPublicKey, AuthError> {
	let block = pem::parse(wrap_pem(material))
		.map_err(|e| AuthError::KeyDecodeFailed(format!("invalid PEM: {e}")))?;

	let spki = SubjectPublicKeyInfoRef::from_der(block.contents())
		.map_err(|e| AuthError::KeyDecodeFailed(format!("invalid SubjectPublicKeyInfo: {e}")))?;

	if spki.algorithm.oid != RSA_ENCRYPTION_OID {
		return Err(AuthError::KeyTypeMismatch {
			algorithm: spki.algorithm.oid.to_string(),
		});
	}

	RsaPublicKey::try_from(spki)
		.map_err(|e| AuthError::KeyDecodeFailed(format!("invalid RSA public key: {e}")))
}

/// Largest plaintext, in bytes, that `key` can encrypt with PKCS#1 v1.5.
pub fn max_plaintext_len(key: &RsaPublicKey) -> usize {
	key.size().saturating_sub(PKCS1_V15_OVERHEAD)
}

/// Encrypt raw bytes under an already-decoded key.
///
/// Oversized input is rejected up front; it is never truncated.
pub fn encrypt_with_key(
	key: &RsaPublicKey,
	plaintext: &[u8],
) -> Result<EncryptedCredential, AuthError> {
	let max = max_plaintext_len(key);
	if plaintext.len() > max {
		return Err(AuthError::EncryptionFailed(format!(
			"password is {} bytes but a {}-bit key accepts at most {max}",
			plaintext.len(),
			key.size() * 8
		)));
	}

	let ciphertext = key
		.encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, plaintext)
		.map_err(|e| AuthError::EncryptionFailed(e.to_string()))?;

	Ok(EncryptedCredential(SecretString::new(STANDARD.encode(ciphertext))))
}

/// Decode `material` and encrypt the UTF-8 bytes of `password` under it.
pub fn encrypt_password(
	material: &PublicKeyMaterial,
	password: &SecretString,
) -> Result<EncryptedCredential, AuthError> {
	let key = decode_public_key(material)?;
	encrypt_with_key(&key, password.expose().as_bytes())
}
