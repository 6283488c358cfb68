// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with a consistent User-Agent and a per-call deadline.
//!
//! Every ssctl call to the Sunsynk cloud is single-attempt: there is no retry
//! layer here, only a timeout that bounds each individual request.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Per-request deadline used when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client builder with the standard ssctl User-Agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Build a client whose requests each give up after `timeout`.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	tracing::trace!(timeout_ms = timeout.as_millis() as u64, "building HTTP client");
	builder().timeout(timeout).build()
}

/// Longest slice of a response body kept in an error.
pub const BODY_SNIPPET_CHARS: usize = 512;

/// Cap a response body for inclusion in an error message.
pub fn body_snippet(body: &str) -> String {
	match body.char_indices().nth(BODY_SNIPPET_CHARS) {
		Some((cut, _)) => format!("{}...", &body[..cut]),
		None => body.to_string(),
	}
}

/// Build a client with [`DEFAULT_TIMEOUT`].
pub fn new_client() -> Result<Client, reqwest::Error> {
	new_client_with_timeout(DEFAULT_TIMEOUT)
}

/// `ssctl/{version} ({os}-{arch})`
pub fn user_agent() -> String {
	format!(
		"ssctl/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_product_version_and_platform() {
		let ua = user_agent();
		assert!(ua.starts_with("ssctl/"));
		assert!(ua.contains(env!("CARGO_PKG_VERSION")));
		assert!(ua.contains(std::env::consts::OS));
		assert!(ua.ends_with(')'));
	}

	#[test]
	fn short_bodies_are_kept_whole() {
		assert_eq!(body_snippet("{\"status\":401}"), "{\"status\":401}");
	}

	#[test]
	fn long_bodies_are_cut_on_a_char_boundary() {
		let body = "é".repeat(BODY_SNIPPET_CHARS + 10);
		let snippet = body_snippet(&body);
		assert!(snippet.ends_with("..."));
		assert_eq!(snippet.chars().count(), BODY_SNIPPET_CHARS + 3);
	}

	#[test]
	fn clients_build() {
		assert!(new_client().is_ok());
		assert!(new_client_with_timeout(Duration::from_millis(250)).is_ok());
	}
}
