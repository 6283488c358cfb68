// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use url::Url;

use crate::runtime::SsctlConfig;
use crate::ConfigError;

/// Validate the configuration.
pub fn validate_config(config: &SsctlConfig) -> Result<(), ConfigError> {
	validate_endpoint("api.endpoint", &config.api.endpoint)?;
	validate_endpoint("api.inverter_endpoint", &config.api.inverter_endpoint)?;

	if config.api.timeout.is_zero() {
		return Err(ConfigError::invalid_value(
			"api.timeout_secs",
			"must be at least 1",
		));
	}

	Ok(())
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
	let url = Url::parse(value.trim())
		.map_err(|e| ConfigError::invalid_value(field, format!("{value:?} is not a URL: {e}")))?;

	match url.scheme() {
		"http" | "https" if url.host().is_some() => Ok(()),
		"http" | "https" => Err(ConfigError::invalid_value(field, "URL has no host")),
		other => Err(ConfigError::invalid_value(
			field,
			format!("scheme {other:?} is not http or https"),
		)),
	}
}
