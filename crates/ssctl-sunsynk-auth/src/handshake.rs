// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The login handshake.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use ssctl_common_secret::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::AuthConfig;
use crate::encrypt::encrypt_password;
use crate::error::AuthError;
use crate::nonce::{NonceClock, SystemClock};
use crate::public_key::fetch_public_key;
use crate::token::{request_token, TokenResult};

/// Turns a username and password into a bearer token.
///
/// Steps, in order, each fed by the previous one:
///
/// 1. nonce, public-key signature, `GET /anonymous/publicKey`
/// 2. PEM-wrap and decode the key, encrypt the password
/// 3. fresh nonce, token signature over the key prefix, `POST /oauth/token/new`
///
/// The first failure ends the attempt and is returned unchanged. Separate
/// handshakes share nothing mutable and may run concurrently.
pub struct AuthHandshake {
	config: AuthConfig,
	http_client: reqwest::Client,
	clock: Arc<dyn NonceClock>,
}

impl fmt::Debug for AuthHandshake {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthHandshake")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

impl AuthHandshake {
	/// Build a handshake whose requests each time out after
	/// [`AuthConfig::request_timeout`].
	#[instrument(skip_all, name = "AuthHandshake::new")]
	pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
		let http_client = ssctl_common_http::new_client_with_timeout(config.request_timeout())?;
		Ok(Self {
			config,
			http_client,
			clock: Arc::new(SystemClock),
		})
	}

	/// Replace the nonce source.
	pub fn with_clock(mut self, clock: Arc<dyn NonceClock>) -> Self {
		self.clock = clock;
		self
	}

	pub fn config(&self) -> &AuthConfig {
		&self.config
	}

	/// Run the handshake once.
	///
	/// If `cancel` fires, the in-flight request is dropped and
	/// [`AuthError::Cancelled`] is returned without starting later steps.
	#[instrument(skip_all, name = "AuthHandshake::login")]
	pub async fn login(
		&self,
		username: &str,
		password: &SecretString,
		cancel: &CancellationToken,
	) -> Result<TokenResult, AuthError> {
		if cancel.is_cancelled() {
			return Err(AuthError::Cancelled);
		}

		let key_nonce = self.clock.now();
		let key = until_cancelled(
			cancel,
			fetch_public_key(&self.http_client, &self.config, key_nonce),
		)
		.await?;
		debug!(key_len = key.as_str().len(), "public key fetched");

		let credential = encrypt_password(&key, password)?;
		debug!("password encrypted");

		if cancel.is_cancelled() {
			return Err(AuthError::Cancelled);
		}

		let token_nonce = self.clock.now();
		let result = until_cancelled(
			cancel,
			request_token(
				&self.http_client,
				&self.config,
				username,
				&credential,
				&key,
				token_nonce,
			),
		)
		.await?;

		debug!(
			token_type = %result.token_type,
			expires_in = result.expires_in,
			"login succeeded"
		);
		Ok(result)
	}
}

async fn until_cancelled<T, F>(cancel: &CancellationToken, step: F) -> Result<T, AuthError>
where
	F: Future<Output = Result<T, AuthError>>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(AuthError::Cancelled),
		result = step => result,
	}
}
