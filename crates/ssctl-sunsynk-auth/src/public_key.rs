// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed fetch of the server's current RSA public key.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::AuthConfig;
use crate::error::{body_snippet, AuthError};
use crate::nonce::Nonce;
use crate::signature::{public_key_signature, SOURCE};

/// Bare base64 DER public key as returned by the server, whitespace-trimmed.
///
/// This is the string the token signature prefix is taken from, so it is kept
/// verbatim rather than re-encoded after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial(String);

impl PublicKeyMaterial {
	pub fn new(material: impl Into<String>) -> Self {
		Self(material.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// `{"data": "<base64>"}`
#[derive(Debug, Deserialize)]
struct PublicKeyEnvelope {
	#[serde(default)]
	data: Option<String>,
}

/// Issue the signed GET and return the key material.
#[instrument(skip_all, fields(nonce = %nonce))]
pub async fn fetch_public_key(
	client: &reqwest::Client,
	config: &AuthConfig,
	nonce: Nonce,
) -> Result<PublicKeyMaterial, AuthError> {
	let mut url = config.public_key_url().clone();
	url
		.query_pairs_mut()
		.append_pair("source", SOURCE)
		.append_pair("nonce", &nonce.to_string())
		.append_pair("sign", &public_key_signature(nonce));

	debug!(url = %url, "requesting public key");
	let response = client.get(url).send().await?;
	let status = response.status();
	let body = response.text().await?;
	debug!(status = %status, body_len = body.len(), "public key response received");

	parse_public_key_response(status, &body)
}

/// Interpret the public-key endpoint's reply.
pub fn parse_public_key_response(
	status: StatusCode,
	body: &str,
) -> Result<PublicKeyMaterial, AuthError> {
	if !status.is_success() {
		return Err(AuthError::KeyFetchFailed {
			status,
			body: body_snippet(body),
		});
	}

	let envelope: PublicKeyEnvelope =
		serde_json::from_str(body).map_err(|source| AuthError::KeyFetchMalformed {
			source,
			body: body_snippet(body),
		})?;

	let material = envelope.data.as_deref().unwrap_or_default().trim();
	if material.is_empty() {
		return Err(AuthError::KeyFetchEmpty);
	}

	Ok(PublicKeyMaterial::new(material))
}
