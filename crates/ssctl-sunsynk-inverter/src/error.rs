// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InverterError {
	#[error("invalid inverter endpoint {endpoint:?}: {source}")]
	InvalidEndpoint {
		endpoint: String,
		#[source]
		source: url::ParseError,
	},

	#[error("inverter endpoint must be http or https, got {0:?}")]
	UnsupportedScheme(String),

	#[error("inverter id must be non-empty")]
	EmptyInverterId,

	#[error("inverter request failed with HTTP {status}: {body}")]
	Http { status: StatusCode, body: String },

	#[error("HTTP transport error: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("unexpected inverter response: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InverterError>;
