// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Handshake failure taxonomy.

use reqwest::StatusCode;

pub(crate) use ssctl_common_http::body_snippet;

/// Everything that can end a login attempt.
///
/// Every variant is terminal for the handshake that produced it. Nothing is
/// retried; the caller decides whether to try again.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// The public-key endpoint answered with a non-2xx status.
	#[error("public key request failed with HTTP {status}: {body}")]
	KeyFetchFailed { status: StatusCode, body: String },

	/// The public-key endpoint answered 2xx but the body was not the expected JSON envelope.
	#[error("public key response is not valid JSON: {source}; body: {body}")]
	KeyFetchMalformed {
		#[source]
		source: serde_json::Error,
		body: String,
	},

	/// The public-key envelope parsed but carried no key.
	#[error("public key response has an empty data field")]
	KeyFetchEmpty,

	/// The key material is not valid PEM/DER.
	#[error("failed to decode public key: {0}")]
	KeyDecodeFailed(String),

	/// The key decoded but is not an RSA key.
	#[error("public key is not RSA (algorithm {algorithm})")]
	KeyTypeMismatch { algorithm: String },

	/// RSA encryption of the password failed.
	#[error("failed to encrypt password: {0}")]
	EncryptionFailed(String),

	/// The request never produced an HTTP response (DNS, connect, TLS, timeout).
	#[error("HTTP transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The token endpoint answered with a status other than 200.
	#[error("token request failed with HTTP {status}: {body}")]
	TokenHttp { status: StatusCode, body: String },

	/// The token endpoint answered 200 with a body that is not JSON.
	#[error("token response is not valid JSON: {source}; body: {body}")]
	TokenMalformed {
		#[source]
		source: serde_json::Error,
		body: String,
	},

	/// The token endpoint answered 200 but did not grant a token.
	#[error("login rejected: msg={message:?}")]
	LoginRejected { message: String },

	/// The caller cancelled the handshake.
	#[error("login cancelled")]
	Cancelled,
}

impl AuthError {
	/// HTTP status carried by the error, if any.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::KeyFetchFailed { status, .. } | Self::TokenHttp { status, .. } => Some(*status),
			Self::Transport(e) => e.status(),
			_ => None,
		}
	}
}
