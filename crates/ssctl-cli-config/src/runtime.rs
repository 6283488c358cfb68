// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::layer::*;
use crate::ConfigError;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.sunsynk.net";
pub const DEFAULT_INVERTER_ENDPOINT: &str = "https://pv.inteless.com/api/v1/inverter/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The final, validated configuration for ssctl.
#[derive(Debug, Clone, Serialize)]
pub struct SsctlConfig {
	pub api: ApiConfig,
	pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
	pub endpoint: String,
	pub inverter_endpoint: String,
	#[serde(serialize_with = "serialize_secs")]
	pub timeout: Duration,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_API_ENDPOINT.to_string(),
			inverter_endpoint: DEFAULT_INVERTER_ENDPOINT.to_string(),
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
		}
	}
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
	s.serialize_u64(d.as_secs())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warn => "warn",
			Self::Info => "info",
			Self::Debug => "debug",
			Self::Trace => "trace",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"error" => Ok(Self::Error),
			"warn" | "warning" => Ok(Self::Warn),
			"info" => Ok(Self::Info),
			"debug" => Ok(Self::Debug),
			"trace" => Ok(Self::Trace),
			other => Err(ConfigError::invalid_value(
				"logging.level",
				format!("unknown level {other:?} (expected trace, debug, info, warn or error)"),
			)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Compact,
	Pretty,
	Json,
}

impl FromStr for LogFormat {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"compact" => Ok(Self::Compact),
			"pretty" => Ok(Self::Pretty),
			"json" => Ok(Self::Json),
			other => Err(ConfigError::invalid_value(
				"logging.format",
				format!("unknown format {other:?} (expected compact, pretty or json)"),
			)),
		}
	}
}

impl SsctlConfig {
	/// Build runtime config from a merged layer.
	pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
		Ok(Self {
			api: build_api_config(layer.api),
			logging: build_logging_config(layer.logging)?,
		})
	}
}

fn build_api_config(layer: Option<ApiLayer>) -> ApiConfig {
	let layer = layer.unwrap_or_default();
	ApiConfig {
		endpoint: layer
			.endpoint
			.unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
		inverter_endpoint: layer
			.inverter_endpoint
			.unwrap_or_else(|| DEFAULT_INVERTER_ENDPOINT.to_string()),
		timeout: Duration::from_secs(layer.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> Result<LoggingConfig, ConfigError> {
	let layer = layer.unwrap_or_default();
	Ok(LoggingConfig {
		level: layer
			.level
			.as_deref()
			.map(str::parse::<LogLevel>)
			.transpose()?
			.unwrap_or_default(),
		format: layer
			.format
			.as_deref()
			.map(str::parse::<LogFormat>)
			.transpose()?
			.unwrap_or_default(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_layer_uses_defaults() {
		let config = SsctlConfig::from_layer(ConfigLayer::default()).unwrap();
		assert_eq!(config.api, ApiConfig::default());
		assert_eq!(config.api.timeout, Duration::from_secs(30));
		assert_eq!(config.logging.level, LogLevel::Warn);
		assert_eq!(config.logging.format, LogFormat::Compact);
	}

	#[test]
	fn test_layer_values_are_applied() {
		let layer = ConfigLayer {
			api: Some(ApiLayer {
				endpoint: Some("http://localhost:8080".into()),
				inverter_endpoint: None,
				timeout_secs: Some(3),
			}),
			logging: Some(LoggingLayer {
				level: Some("TRACE".into()),
				format: Some("json".into()),
			}),
		};
		let config = SsctlConfig::from_layer(layer).unwrap();
		assert_eq!(config.api.endpoint, "http://localhost:8080");
		assert_eq!(config.api.inverter_endpoint, DEFAULT_INVERTER_ENDPOINT);
		assert_eq!(config.api.timeout, Duration::from_secs(3));
		assert_eq!(config.logging.level, LogLevel::Trace);
		assert_eq!(config.logging.format, LogFormat::Json);
	}

	#[test]
	fn test_unknown_level_is_rejected() {
		let layer = ConfigLayer {
			logging: Some(LoggingLayer {
				level: Some("loud".into()),
				format: None,
			}),
			..Default::default()
		};
		let err = SsctlConfig::from_layer(layer).unwrap_err();
		assert!(err.to_string().contains("logging.level"));
	}

	#[test]
	fn test_serializes_timeout_as_seconds() {
		let config = SsctlConfig::from_layer(ConfigLayer::default()).unwrap();
		let value = toml::Value::try_from(&config).unwrap();
		assert_eq!(value["api"]["timeout"].as_integer(), Some(30));
		assert_eq!(value["logging"]["level"].as_str(), Some("warn"));
	}
}
