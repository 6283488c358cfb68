// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request signing.
//!
//! The server expects `sign = md5_hex("nonce=<n>&source=<suffix>")`. The hash
//! is unkeyed; it only proves the client knows the scheme.
//!
//! There are two signing procedures and they are NOT interchangeable:
//!
//! | call        | signed suffix                                   |
//! |-------------|-------------------------------------------------|
//! | public key  | `sunsynk` + literal `POWER_VIEW`                |
//! | token       | `sunsynk` + first 10 chars of the public key    |
//!
//! The token suffix ties the login request to the key its password was
//! encrypted under. Keep [`public_key_signature`] and [`token_signature`]
//! separate even though they look alike.

use md5::{Digest, Md5};

use crate::nonce::Nonce;
use crate::public_key::PublicKeyMaterial;

/// Platform identifier sent as `source` and mixed into every signature.
pub const SOURCE: &str = "sunsynk";

/// Literal suffix of the public-key signature.
pub const PUBLIC_KEY_SUFFIX: &str = "POWER_VIEW";

/// Number of leading key characters mixed into the token signature.
pub const TOKEN_KEY_PREFIX_CHARS: usize = 10;

/// The exact string the server hashes.
pub fn signature_input(nonce: Nonce, source_suffix: &str) -> String {
	format!("nonce={nonce}&source={source_suffix}")
}

/// Lowercase hex MD5 of [`signature_input`].
pub fn compute_signature(nonce: Nonce, source_suffix: &str) -> String {
	let digest = Md5::digest(signature_input(nonce, source_suffix).as_bytes());
	hex::encode(digest)
}

/// Signature for `GET /anonymous/publicKey`.
pub fn public_key_signature(nonce: Nonce) -> String {
	compute_signature(nonce, &format!("{SOURCE}{PUBLIC_KEY_SUFFIX}"))
}

/// Signature for `POST /oauth/token/new`, bound to the fetched key.
///
/// Keys shorter than ten characters are used whole.
pub fn token_signature(nonce: Nonce, key: &PublicKeyMaterial) -> String {
	let prefix: String = key.as_str().chars().take(TOKEN_KEY_PREFIX_CHARS).collect();
	compute_signature(nonce, &format!("{SOURCE}{prefix}"))
}
