// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ssctl auth`: credential exchange.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ssctl_cli_config::ApiConfig;
use ssctl_common_config::require_secret_env;
use ssctl_sunsynk_auth::{AuthConfig, AuthHandshake, TokenResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What `ssctl auth` prints: the token plus when it was issued.
#[derive(Serialize)]
pub struct TokenRecord<'a> {
	pub token: &'a str,
	#[serde(rename = "type")]
	pub token_type: &'a str,
	pub refresh: &'a str,
	/// Seconds until the token expires, counted from `timestamp`.
	pub expiry: i64,
	pub scope: &'a str,
	/// Unix seconds at which the token was received.
	pub timestamp: i64,
}

impl<'a> TokenRecord<'a> {
	pub fn new(result: &'a TokenResult, received_at: DateTime<Utc>) -> Self {
		Self {
			token: result.access_token.expose(),
			token_type: &result.token_type,
			refresh: result.refresh_token.expose(),
			expiry: result.expires_in,
			scope: &result.scope,
			timestamp: received_at.timestamp(),
		}
	}
}

pub async fn run(api: &ApiConfig) -> Result<()> {
	// Credentials are checked before any network traffic.
	let username = require_secret_env("SS_USER").context("no Sunsynk username")?;
	let password = require_secret_env("SS_PASS").context("no Sunsynk password")?;

	let config = AuthConfig::new(&api.endpoint)
		.and_then(|c| c.with_request_timeout(api.timeout))
		.context("invalid API configuration")?;
	let handshake = AuthHandshake::new(config).context("failed to build HTTP client")?;

	let cancel = CancellationToken::new();
	let interrupt = tokio::spawn({
		let cancel = cancel.clone();
		async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				debug!("interrupt received, cancelling login");
				cancel.cancel();
			}
		}
	});

	let outcome = handshake
		.login(username.expose(), &password, &cancel)
		.await;
	interrupt.abort();
	let result = outcome.context("Sunsynk login failed")?;

	info!(expires_in = result.expires_in, "login succeeded");

	let record = TokenRecord::new(&result, Utc::now());
	println!(
		"{}",
		serde_json::to_string(&record).context("failed to encode token record")?
	);
	Ok(())
}
