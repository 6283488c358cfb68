// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed, encrypted token request and response interpretation.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use ssctl_common_secret::SecretString;
use tracing::{debug, instrument};

use crate::config::AuthConfig;
use crate::encrypt::EncryptedCredential;
use crate::error::{body_snippet, AuthError};
use crate::nonce::Nonce;
use crate::public_key::PublicKeyMaterial;
use crate::signature::{token_signature, SOURCE};

/// OAuth client id of the Sunsynk web portal.
pub const CLIENT_ID: &str = "csp-web";

/// OAuth grant type for username/password login.
pub const GRANT_TYPE: &str = "password";

/// The only `msg` value that accompanies a granted token.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Body of `POST /oauth/token/new`. Field order matches the web portal.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
	pub client_id: &'static str,
	pub grant_type: &'static str,
	pub password: &'a str,
	pub source: &'static str,
	pub username: &'a str,
	pub nonce: i64,
	pub sign: String,
}

impl<'a> LoginRequest<'a> {
	/// Sign a login for `username` with the token-call procedure.
	pub fn new(
		username: &'a str,
		credential: &'a EncryptedCredential,
		key: &PublicKeyMaterial,
		nonce: Nonce,
	) -> Self {
		Self {
			client_id: CLIENT_ID,
			grant_type: GRANT_TYPE,
			password: credential.expose(),
			source: SOURCE,
			username,
			nonce: nonce.as_millis(),
			sign: token_signature(nonce, key),
		}
	}
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
	#[serde(default)]
	msg: Option<String>,
	#[serde(default)]
	data: Option<TokenData>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenData {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(default)]
	scope: Option<String>,
}

/// A granted bearer token.
///
/// Only ever built for an HTTP 200 reply whose `msg` is `"Success"` and whose
/// access token is non-empty, so `success` is always `true` on values handed
/// to callers. Tokens are wrapped so they cannot end up in logs.
#[derive(Debug, Clone)]
pub struct TokenResult {
	pub success: bool,
	pub message: String,
	pub access_token: SecretString,
	pub token_type: String,
	pub refresh_token: SecretString,
	/// Lifetime in seconds.
	pub expires_in: i64,
	pub scope: String,
}

/// POST the login and interpret the reply.
#[instrument(skip_all, fields(nonce = %nonce))]
pub async fn request_token(
	client: &reqwest::Client,
	config: &AuthConfig,
	username: &str,
	credential: &EncryptedCredential,
	key: &PublicKeyMaterial,
	nonce: Nonce,
) -> Result<TokenResult, AuthError> {
	let request = LoginRequest::new(username, credential, key, nonce);

	debug!(url = %config.token_url(), "requesting token");
	let response = client
		.post(config.token_url().clone())
		.json(&request)
		.send()
		.await?;
	let status = response.status();
	let body = response.text().await?;
	debug!(status = %status, body_len = body.len(), "token response received");

	interpret_token_response(status, &body)
}

/// Decide whether a token-endpoint reply granted a token.
///
/// HTTP 200 on its own is not success: the envelope must also say
/// `"Success"` and carry a non-empty access token.
pub fn interpret_token_response(status: StatusCode, body: &str) -> Result<TokenResult, AuthError> {
	if status != StatusCode::OK {
		return Err(AuthError::TokenHttp {
			status,
			body: body_snippet(body),
		});
	}

	let envelope: TokenEnvelope =
		serde_json::from_str(body).map_err(|source| AuthError::TokenMalformed {
			source,
			body: body_snippet(body),
		})?;

	let message = envelope.msg.unwrap_or_default();
	let data = envelope.data.unwrap_or_default();
	let access_token = data.access_token.unwrap_or_default();

	if message != SUCCESS_MESSAGE || access_token.is_empty() {
		return Err(AuthError::LoginRejected { message });
	}

	Ok(TokenResult {
		success: true,
		message,
		access_token: SecretString::new(access_token),
		token_type: data.token_type.unwrap_or_default(),
		refresh_token: SecretString::new(data.refresh_token.unwrap_or_default()),
		expires_in: data.expires_in.unwrap_or_default(),
		scope: data.scope.unwrap_or_default(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const GRANTED: &str = r#"{"code":0,"msg":"Success","success":true,"data":{"access_token":"tok123","token_type":"bearer","refresh_token":"ref123","expires_in":7200,"scope":"all"}}"#;

	#[test]
	fn granted_token_is_returned() {
		let result = interpret_token_response(StatusCode::OK, GRANTED).unwrap();
		assert!(result.success);
		assert_eq!(result.message, "Success");
		assert_eq!(result.access_token.expose(), "tok123");
		assert_eq!(result.token_type, "bearer");
		assert_eq!(result.refresh_token.expose(), "ref123");
		assert_eq!(result.expires_in, 7200);
		assert_eq!(result.scope, "all");
	}

	#[test]
	fn success_message_with_empty_token_is_rejected() {
		let body = r#"{"code":200,"msg":"Success","success":true,"data":{"access_token":""}}"#;
		let err = interpret_token_response(StatusCode::OK, body).unwrap_err();
		match err {
			AuthError::LoginRejected { message } => assert_eq!(message, "Success"),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn other_message_with_token_is_rejected() {
		let body = r#"{"code":102,"msg":"Incorrect username or password","success":false,"data":{"access_token":"tok123"}}"#;
		let err = interpret_token_response(StatusCode::OK, body).unwrap_err();
		match err {
			AuthError::LoginRejected { message } => {
				assert_eq!(message, "Incorrect username or password")
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn message_match_is_case_sensitive() {
		let body = r#"{"msg":"success","data":{"access_token":"tok123"}}"#;
		let err = interpret_token_response(StatusCode::OK, body).unwrap_err();
		assert!(matches!(err, AuthError::LoginRejected { .. }));
	}

	#[test]
	fn missing_data_is_rejected() {
		let err = interpret_token_response(StatusCode::OK, r#"{"msg":"Success","data":null}"#).unwrap_err();
		assert!(matches!(err, AuthError::LoginRejected { .. }));
	}

	#[test]
	fn non_json_200_is_malformed() {
		let err = interpret_token_response(StatusCode::OK, "OK").unwrap_err();
		assert!(matches!(err, AuthError::TokenMalformed { .. }));
	}

	#[test]
	fn non_200_is_http_error_even_if_2xx() {
		let err = interpret_token_response(StatusCode::CREATED, GRANTED).unwrap_err();
		assert_eq!(err.status(), Some(StatusCode::CREATED));
		assert!(matches!(err, AuthError::TokenHttp { .. }));
	}

	#[test]
	fn unauthorized_keeps_error_envelope() {
		let body = r#"{"timestamp":"2024-05-01T10:00:00.000+00:00","status":401,"error":"Unauthorized","path":"/oauth/token/new"}"#;
		let err = interpret_token_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
		match err {
			AuthError::TokenHttp { status, body } => {
				assert_eq!(status, StatusCode::UNAUTHORIZED);
				assert!(body.contains("/oauth/token/new"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn tokens_are_not_in_debug_output() {
		let result = interpret_token_response(StatusCode::OK, GRANTED).unwrap();
		let debug = format!("{result:?}");
		assert!(!debug.contains("tok123"));
		assert!(!debug.contains("ref123"));
	}

	#[test]
	fn login_request_serializes_in_portal_order() {
		let key = PublicKeyMaterial::new("MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8A");
		let credential = EncryptedCredential::for_tests("Y2lwaGVy");
		let nonce = Nonce::from_millis(1_700_000_000_123);
		let request = LoginRequest::new("installer@example.com", &credential, &key, nonce);

		let json = serde_json::to_string(&request).unwrap();
		let expected_sign = crate::signature::compute_signature(nonce, "sunsynkMIIBIjANBg");
		assert_eq!(
			json,
			format!(
				r#"{{"client_id":"csp-web","grant_type":"password","password":"Y2lwaGVy","source":"sunsynk","username":"installer@example.com","nonce":1700000000123,"sign":"{expected_sign}"}}"#
			)
		);
	}
}
