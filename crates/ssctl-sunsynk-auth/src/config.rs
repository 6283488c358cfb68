// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Endpoint and deadline configuration for the handshake.

use std::time::Duration;

use url::Url;

/// Production API host.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.sunsynk.net";

const TOKEN_PATH: &str = "/oauth/token/new";
const PUBLIC_KEY_PATH: &str = "/anonymous/publicKey";

#[derive(Debug, thiserror::Error)]
pub enum AuthConfigError {
	#[error("invalid API endpoint {endpoint:?}: {source}")]
	InvalidEndpoint {
		endpoint: String,
		#[source]
		source: url::ParseError,
	},

	#[error("API endpoint {0:?} must use http or https")]
	UnsupportedScheme(String),

	#[error("request timeout must be greater than zero")]
	ZeroTimeout,
}

/// Where and how patiently to talk to the Sunsynk API.
///
/// Passed explicitly into [`crate::AuthHandshake::new`]; nothing is read from
/// the process environment here.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	token_url: Url,
	public_key_url: Url,
	request_timeout: Duration,
}

impl AuthConfig {
	/// Derive both endpoint URLs from one base endpoint.
	///
	/// The token URL is `<endpoint>/oauth/token/new`. The public-key URL keeps
	/// only the scheme, host and port of the token URL, so a base endpoint
	/// with a path prefix still fetches the key from the host root.
	pub fn new(endpoint: &str) -> Result<Self, AuthConfigError> {
		let base = endpoint.trim().trim_end_matches('/');
		let token_url =
			Url::parse(&format!("{base}{TOKEN_PATH}")).map_err(|source| AuthConfigError::InvalidEndpoint {
				endpoint: endpoint.to_string(),
				source,
			})?;

		if !matches!(token_url.scheme(), "http" | "https") || token_url.host_str().is_none() {
			return Err(AuthConfigError::UnsupportedScheme(endpoint.to_string()));
		}

		let mut public_key_url = token_url.clone();
		public_key_url.set_path(PUBLIC_KEY_PATH);
		public_key_url.set_query(None);

		Ok(Self {
			token_url,
			public_key_url,
			request_timeout: ssctl_common_http::DEFAULT_TIMEOUT,
		})
	}

	/// Override the per-request deadline (default 30 s).
	pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, AuthConfigError> {
		if timeout.is_zero() {
			return Err(AuthConfigError::ZeroTimeout);
		}
		self.request_timeout = timeout;
		Ok(self)
	}

	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	pub fn public_key_url(&self) -> &Url {
		&self.public_key_url
	}

	pub fn request_timeout(&self) -> Duration {
		self.request_timeout
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		// The constant is a well-formed https URL.
		Self::new(DEFAULT_API_ENDPOINT).expect("default API endpoint is valid")
	}
}
