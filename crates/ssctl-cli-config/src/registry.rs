// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration registry - manages sources and merges layers.

use tracing::debug;

use crate::layer::ConfigLayer;
use crate::runtime::SsctlConfig;
use crate::sources::ConfigSource;
use crate::validation::validate_config;
use crate::ConfigError;

/// Registry that manages configuration sources and merges them.
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	/// Register a configuration source.
	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		debug!(source = source.name(), precedence = ?source.precedence(), "registering config source");
		self.sources.push(source);
	}

	/// Load configuration from all sources, merge, and validate.
	///
	/// Sources are sorted by precedence (lowest first) and merged so higher
	/// precedence sources override lower ones. Absent optional files load as
	/// empty layers; any other source failure is returned.
	pub fn load(&self) -> Result<SsctlConfig, ConfigError> {
		let mut sorted_sources: Vec<_> = self.sources.iter().collect();
		sorted_sources.sort_by_key(|s| s.precedence());

		let mut merged = ConfigLayer::default();
		for source in &sorted_sources {
			let layer = source.load()?;
			debug!(source = source.name(), "merging config layer");
			merged.merge(layer);
		}

		let config = SsctlConfig::from_layer(merged)?;
		validate_config(&config)?;

		debug!(
			endpoint = %config.api.endpoint,
			timeout_secs = config.api.timeout.as_secs(),
			log_level = %config.logging.level,
			"configuration loaded"
		);

		Ok(config)
	}

}

impl Default for ConfigRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layer::ApiLayer;
	use crate::sources::{CliOverrides, CliSource, DefaultsSource, EnvSource, Precedence};

	struct MockSource {
		name: &'static str,
		precedence: Precedence,
		endpoint: &'static str,
	}

	impl ConfigSource for MockSource {
		fn name(&self) -> &'static str {
			self.name
		}
		fn precedence(&self) -> Precedence {
			self.precedence
		}

		fn load(&self) -> Result<ConfigLayer, ConfigError> {
			Ok(ConfigLayer {
				api: Some(ApiLayer {
					endpoint: Some(self.endpoint.to_string()),
					..Default::default()
				}),
				..Default::default()
			})
		}
	}

	#[test]
	fn test_registry_loads_with_defaults() {
		let mut registry = ConfigRegistry::new();
		registry.register(Box::new(DefaultsSource));

		let config = registry.load().unwrap();
		assert_eq!(config.api.endpoint, "https://api.sunsynk.net");
	}

	/// Registration order does not matter; precedence does.
	#[test]
	fn test_precedence_merge_order() {
		let mut registry = ConfigRegistry::new();
		registry.register(Box::new(MockSource {
			name: "cli",
			precedence: Precedence::Cli,
			endpoint: "https://cli.example",
		}));
		registry.register(Box::new(MockSource {
			name: "user",
			precedence: Precedence::UserFile,
			endpoint: "https://user.example",
		}));

		let config = registry.load().unwrap();
		assert_eq!(config.api.endpoint, "https://cli.example");
	}

	#[test]
	fn test_cli_beats_environment() {
		let mut registry = ConfigRegistry::new();
		registry.register(Box::new(CliSource::new(CliOverrides {
			api_endpoint: Some("https://cli.example".into()),
			..Default::default()
		})));
		registry.register(Box::new(EnvSource::from_vars([
			("SS_API_ENDPOINT", "https://env.example"),
			("SS_API_TIMEOUT_SECS", "7"),
		])));

		let config = registry.load().unwrap();
		assert_eq!(config.api.endpoint, "https://cli.example");
		assert_eq!(config.api.timeout.as_secs(), 7);
	}

	#[test]
	fn test_invalid_merged_config_is_rejected() {
		let mut registry = ConfigRegistry::new();
		registry.register(Box::new(EnvSource::from_vars([("SS_API_TIMEOUT_SECS", "0")])));

		let err = registry.load().unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}
}
